//! Orders page.
//!
//! # Usage
//!
//! ```bash
//! shopdesk orders list --status pending
//! shopdesk orders list --status pending --server-filter
//! shopdesk orders set-status 7 shipped
//! ```

use shopdesk_admin::AdminConsole;
use shopdesk_core::{OrderId, OrderStatus};

use super::{CliError, Output};

pub async fn list(
    console: &AdminConsole,
    out: Output,
    status: Option<OrderStatus>,
    server_filter: bool,
) -> Result<(), CliError> {
    let mut view = console.orders().await?;
    match status {
        Some(status) if server_filter => {
            view.list_with_status(status).await?;
        }
        _ => {
            view.set_status_filter(status);
            view.list().await?;
        }
    }
    out.view(&view)
}

pub async fn set_status(
    console: &AdminConsole,
    out: Output,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), CliError> {
    let mut view = console.orders().await?;
    view.list().await?;
    let order = view.set_status(id, status).await?;
    out.record(&order, format!("Order {} is now {}", order.id, order.status))
}
