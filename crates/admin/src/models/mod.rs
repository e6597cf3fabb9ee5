//! Domain models for the admin console.
//!
//! Records mirror the backend's JSON (snake_case field names). Optional text
//! fields arrive as `null`, absent, or `""` depending on the endpoint; all
//! three decode to `None`.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, StatusChange};
pub use product::{NewProduct, Product, ProductUpdate};
pub use user::{User, UserUpdate};

use std::fmt::Display;

use serde::{Deserialize, Deserializer};

/// A record that lives in a collection cache.
pub trait Entity {
    type Id: Copy + Eq + Display;

    fn id(&self) -> Self::Id;
}

/// Deserialize an optional string, treating blank text as absent.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Trim `value` and return it if anything is left.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
