//! Dashboard: collection counts and recent orders.

use serde::Serialize;
use serde_json::Value;
use shopdesk_core::OrderStatus;
use tracing::instrument;

use super::orders::{ORDERS_PATH, fetch_orders, order_columns, order_row};
use super::{Collection, ResourceView, call, schema_error};
use crate::api::{ApiClient, decode_list};
use crate::components::TableColumn;
use crate::error::AdminError;
use crate::models::Order;

/// Headline counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub users: usize,
    pub products: usize,
    pub orders: usize,
}

/// Landing page of the console.
#[derive(Debug)]
pub struct DashboardView {
    api: ApiClient,
    recent: Collection<Order>,
}

impl DashboardView {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            recent: Collection::new("Order"),
        }
    }

    /// Count users, products and orders. The three requests run concurrently
    /// and the first failure aborts the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails or a response is not a list.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        let (users, products, orders) = tokio::try_join!(
            count(&self.api, "/users", "users"),
            count(&self.api, "/products", "products"),
            count(&self.api, ORDERS_PATH, "orders"),
        )?;
        Ok(DashboardStats {
            users,
            products,
            orders,
        })
    }

    /// Load recent orders, letting the backend filter by `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn recent_orders(
        &mut self,
        status: Option<OrderStatus>,
    ) -> Result<&[Order], AdminError> {
        let orders = fetch_orders(&self.api, status).await?;
        self.recent.replace_all(orders);
        Ok(self.recent.items())
    }
}

async fn count(api: &ApiClient, path: &str, key: &str) -> Result<usize, AdminError> {
    let action = format!("Failed to fetch {key}");
    let value = call(api, &action, api.get_value(path, &[])).await?;
    let items: Vec<Value> = decode_list(value, key).map_err(schema_error(&action))?;
    Ok(items.len())
}

impl ResourceView for DashboardView {
    type Entity = Order;

    const NOUN: &'static str = "orders";

    fn cache(&self) -> &Collection<Order> {
        &self.recent
    }

    fn visible(&self) -> Vec<&Order> {
        self.recent.items().iter().collect()
    }

    fn columns() -> Vec<TableColumn> {
        order_columns()
    }

    fn row(order: &Order) -> Vec<String> {
        order_row(order)
    }
}
