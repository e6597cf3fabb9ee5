//! Customer orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopdesk_core::{OrderId, OrderStatus, Price, ProductId};

use super::Entity;

/// An order as listed by `GET /admin/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub address: String,
    pub total_amount: Price,
    pub status: OrderStatus,
    #[serde(default, alias = "order_items", deserialize_with = "null_as_empty")]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Number of units across all line items.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    pub price: Price,
}

/// Body of `PUT /admin/orders/:id`, and the part of its response the
/// console reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<OrderItem>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_listed_order() {
        let order: Order = serde_json::from_value(json!({
            "id": 7,
            "total_amount": 598.0,
            "address": "12 MG Road",
            "status": "processing",
            "created_at": "2024-05-01T10:00:00+05:30",
            "user_name": "Asha Rao",
            "items": [
                {"product_id": 1, "name": "Tea", "quantity": 2, "price": 299.0}
            ]
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.unit_count(), 2);
        assert_eq!(order.created_at.to_rfc3339(), "2024-05-01T04:30:00+00:00");
    }

    #[test]
    fn test_decode_model_shaped_order() {
        let order: Order = serde_json::from_value(json!({
            "id": 7,
            "user_id": 3,
            "total_amount": 10,
            "address": "x",
            "status": "shipped",
            "created_at": "2024-05-01T10:00:00Z",
            "order_items": null
        }))
        .unwrap();
        assert!(order.items.is_empty());
        assert!(order.user_name.is_empty());
    }

    #[test]
    fn test_status_change_body() {
        let body = StatusChange {
            status: OrderStatus::Shipped,
        };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"status": "shipped"}));
    }
}
