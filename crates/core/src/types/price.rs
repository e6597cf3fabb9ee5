//! Decimal money amounts.
//!
//! The backend stores prices as `decimal(10,2)` and sends them as JSON
//! numbers, so [`Price`] serializes as a number and accepts either a number
//! or a numeric string when deserializing.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol shown in tables. The store trades in a single currency.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A money amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build a price from minor units (e.g. paise or cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Decimal>().map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Price::from_minor(1999).to_string(), "₹19.99");
        assert_eq!("5".parse::<Price>().unwrap().to_string(), "₹5.00");
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_value(Price::from_minor(1250)).unwrap();
        assert!(json.is_number());
        assert!((json.as_f64().unwrap() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("149.5").unwrap();
        let from_string: Price = serde_json::from_str("\"149.50\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_is_negative() {
        assert!("-0.01".parse::<Price>().unwrap().is_negative());
        assert!(!Price::ZERO.is_negative());
    }
}
