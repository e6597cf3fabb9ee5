//! Integration tests for the dashboard and stale-result handling.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use shopdesk_admin::{AdminError, ResourceView};
use shopdesk_core::OrderStatus;
use shopdesk_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend};

#[tokio::test]
async fn stats_count_each_collection() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let dashboard = console.dashboard().await.unwrap();

    let stats = dashboard.stats().await.unwrap();
    assert_eq!(stats.users, 4);
    assert_eq!(stats.products, 3);
    assert_eq!(stats.orders, 3);

    assert_eq!(backend.count("GET /users"), 1);
    assert_eq!(backend.count("GET /products"), 1);
    assert_eq!(backend.count("GET /admin/orders"), 1);
}

#[tokio::test]
async fn recent_orders_use_the_backend_filter() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut dashboard = console.dashboard().await.unwrap();

    let pending = dashboard
        .recent_orders(Some(OrderStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));
    assert_eq!(dashboard.visible().len(), 2);
}

#[tokio::test]
async fn empty_store_counts_zero() {
    let backend = MockBackend::spawn().await;
    backend.set_products(&[]);
    backend.clear_orders();
    let console = backend.admin_console().await;
    let mut dashboard = console.dashboard().await.unwrap();

    let stats = dashboard.stats().await.unwrap();
    assert_eq!((stats.products, stats.orders), (0, 0));

    dashboard.recent_orders(None).await.unwrap();
    assert!(dashboard.table().render().ends_with("No orders found\n"));
}

#[tokio::test]
async fn result_arriving_after_logout_is_dropped() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();
    backend.set_list_delay(Duration::from_millis(200));

    let (result, ()) = tokio::join!(orders.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        console.logout().await.unwrap();
    });

    assert!(matches!(result, Err(AdminError::Stale)));
    assert!(!orders.cache().is_loaded());
}

#[tokio::test]
async fn result_arriving_after_relogin_is_dropped() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let dashboard = console.dashboard().await.unwrap();
    backend.set_list_delay(Duration::from_millis(200));

    let (result, ()) = tokio::join!(dashboard.stats(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        console.logout().await.unwrap();
        console
            .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
            .await
            .unwrap();
    });

    assert!(matches!(result, Err(AdminError::Stale)));
}
