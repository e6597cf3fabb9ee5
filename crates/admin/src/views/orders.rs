//! Orders view.

use shopdesk_core::{OrderId, OrderStatus};
use tracing::{info, instrument};

use super::{Collection, ResourceView, call, schema_error};
use crate::api::{ApiClient, decode_item, decode_list};
use crate::components::TableColumn;
use crate::error::AdminError;
use crate::models::{Order, StatusChange};

pub(crate) const ORDERS_PATH: &str = "/admin/orders";

/// Order fulfilment: list orders and move them through their statuses.
#[derive(Debug)]
pub struct OrdersView {
    api: ApiClient,
    cache: Collection<Order>,
    status_filter: Option<OrderStatus>,
}

impl OrdersView {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Collection::new("Order"),
            status_filter: None,
        }
    }

    /// Show only orders in `status`; `None` shows all.
    pub const fn set_status_filter(&mut self, status: Option<OrderStatus>) {
        self.status_filter = status;
    }

    /// Fetch every order and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list(&mut self) -> Result<&[Order], AdminError> {
        self.fetch(None).await
    }

    /// Fetch only orders in `status`, filtered by the backend.
    ///
    /// The cache then holds just those orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_with_status(&mut self, status: OrderStatus) -> Result<&[Order], AdminError> {
        self.fetch(Some(status)).await
    }

    #[instrument(skip(self))]
    async fn fetch(&mut self, status: Option<OrderStatus>) -> Result<&[Order], AdminError> {
        let orders = fetch_orders(&self.api, status).await?;
        self.cache.replace_all(orders);
        Ok(self.cache.items())
    }

    /// Move an order to `status`.
    ///
    /// The cached order is patched from the status the backend reports back,
    /// without refetching. Setting the status an order already has is a
    /// no-op on the cache.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn set_status(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, AdminError> {
        const ACTION: &str = "Failed to update order status";
        self.cache.require(id)?;

        let path = format!("{ORDERS_PATH}/{id}");
        let value = call(&self.api, ACTION, self.api.put(&path, &StatusChange { status })).await?;

        let applied = decode_item::<StatusChange>(value, "order")
            .map_err(schema_error(ACTION))?
            .map_or(status, |echo| echo.status);

        self.cache.patch(id, |order| order.status = applied);
        info!(order_id = %id, status = %applied, "Order status updated");
        Ok(self.cache.require(id)?.clone())
    }
}

/// `GET /admin/orders`, optionally filtered by the backend.
pub(crate) async fn fetch_orders(
    api: &ApiClient,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, AdminError> {
    const ACTION: &str = "Failed to fetch orders";
    let query: Vec<(&str, &str)> = status.iter().map(|s| ("status", s.as_str())).collect();
    let value = call(api, ACTION, api.get_value(ORDERS_PATH, &query)).await?;
    decode_list(value, "orders").map_err(schema_error(ACTION))
}

/// Table cells shared by every order listing.
pub(crate) fn order_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::numeric("id", "ID"),
        TableColumn::new("customer", "Customer"),
        TableColumn::new("items", "Items"),
        TableColumn::numeric("total", "Total"),
        TableColumn::new("status", "Status"),
        TableColumn::new("placed", "Placed"),
    ]
}

pub(crate) fn order_row(order: &Order) -> Vec<String> {
    let items = order
        .items
        .iter()
        .map(|item| format!("{} x{}", item.name, item.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        order.id.to_string(),
        order.user_name.clone(),
        items,
        order.total_amount.to_string(),
        order.status.to_string(),
        order.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

impl ResourceView for OrdersView {
    type Entity = Order;

    const NOUN: &'static str = "orders";

    fn cache(&self) -> &Collection<Order> {
        &self.cache
    }

    fn visible(&self) -> Vec<&Order> {
        let status = self.status_filter;
        self.cache
            .filtered(move |order| status.is_none_or(|s| order.status == s))
    }

    fn columns() -> Vec<TableColumn> {
        order_columns()
    }

    fn row(order: &Order) -> Vec<String> {
        order_row(order)
    }
}
