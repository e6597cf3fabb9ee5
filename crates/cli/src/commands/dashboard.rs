//! Dashboard page: collection counts followed by recent orders.

use serde::Serialize;
use shopdesk_admin::{AdminConsole, ResourceView};
use shopdesk_admin::models::Order;
use shopdesk_admin::views::DashboardStats;
use shopdesk_core::OrderStatus;

use super::{CliError, Output};

#[derive(Serialize)]
struct Dashboard<'a> {
    stats: DashboardStats,
    recent_orders: Vec<&'a Order>,
}

pub async fn show(
    console: &AdminConsole,
    out: Output,
    status: Option<OrderStatus>,
) -> Result<(), CliError> {
    let mut view = console.dashboard().await?;
    let stats = view.stats().await?;
    view.recent_orders(status).await?;

    if out.is_json() {
        let dashboard = Dashboard {
            stats,
            recent_orders: view.visible(),
        };
        return out.record(&dashboard, "");
    }

    out.line(format!(
        "Users: {}  Products: {}  Orders: {}",
        stats.users, stats.products, stats.orders
    ))?;
    out.line("")?;
    out.view(&view)
}
