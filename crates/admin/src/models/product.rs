//! Catalog products.

use serde::{Deserialize, Serialize};
use shopdesk_core::{Price, ProductId};

use super::{Entity, empty_string_as_none, non_blank};
use crate::error::ValidationError;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Case-insensitive category match.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(category.trim()))
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Body of `POST /admin/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i64,
    pub category: String,
    pub image_url: String,
}

impl NewProduct {
    /// Validate and build a new product.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if the name is blank and
    /// `ValidationError::Negative` if price or stock is below zero.
    pub fn new(name: &str, price: Price, stock_quantity: i64) -> Result<Self, ValidationError> {
        let name = non_blank(Some(name)).ok_or(ValidationError::Required("Name"))?;
        if price.is_negative() {
            return Err(ValidationError::Negative("Price"));
        }
        if stock_quantity < 0 {
            return Err(ValidationError::Negative("Stock quantity"));
        }
        Ok(Self {
            name,
            description: String::new(),
            price,
            stock_quantity,
            category: String::new(),
            image_url: String::new(),
        })
    }

    #[must_use]
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = non_blank(description).unwrap_or_default();
        self
    }

    #[must_use]
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = non_blank(category).unwrap_or_default();
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: Option<&str>) -> Self {
        self.image_url = non_blank(image_url).unwrap_or_default();
        self
    }
}

/// Body of `PUT /admin/products/:id`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// Check the update before sending it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NothingToUpdate` if no field is set,
    /// `Required` for a blank name and `Negative` for a negative price or
    /// stock.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self == &Self::default() {
            return Err(ValidationError::NothingToUpdate);
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::Required("Name"));
        }
        if self.price.is_some_and(|p| p.is_negative()) {
            return Err(ValidationError::Negative("Price"));
        }
        if self.stock_quantity.is_some_and(|q| q < 0) {
            return Err(ValidationError::Negative("Stock quantity"));
        }
        Ok(())
    }

    /// Apply the set fields to a cached product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            product.description = non_blank(Some(description));
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(category) = &self.category {
            product.category = non_blank(Some(category));
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = non_blank(Some(image_url));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_product_with_float_price() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Mango Pickle",
            "description": "",
            "price": 249.5,
            "stock_quantity": 12,
            "category": "Pantry",
            "image_url": ""
        }))
        .unwrap();
        assert_eq!(product.price, Price::from_minor(24_950));
        assert!(product.description.is_none());
        assert!(product.in_category("pantry"));
    }

    #[test]
    fn test_new_product_validation() {
        assert_eq!(
            NewProduct::new(" ", Price::ZERO, 0),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(
            NewProduct::new("Tea", Price::new(Decimal::NEGATIVE_ONE), 0),
            Err(ValidationError::Negative("Price"))
        );
        assert_eq!(
            NewProduct::new("Tea", Price::ZERO, -1),
            Err(ValidationError::Negative("Stock quantity"))
        );
    }

    #[test]
    fn test_new_product_serializes_price_as_number() {
        let product = NewProduct::new("Tea", Price::from_minor(1999), 5)
            .unwrap()
            .category(Some("Drinks"));
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(19.99));
        assert_eq!(value["category"], "Drinks");
        assert_eq!(value["description"], "");
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert_eq!(
            ProductUpdate::default().validate(),
            Err(ValidationError::NothingToUpdate)
        );
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = ProductUpdate {
            stock_quantity: Some(3),
            ..ProductUpdate::default()
        };
        update.validate().unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"stock_quantity": 3})
        );
    }
}
