//! Integration tests for the orders view.

#![allow(clippy::unwrap_used)]

use shopdesk_admin::{AdminError, ResourceView, ValidationError};
use shopdesk_core::{OrderId, OrderStatus};
use shopdesk_integration_tests::MockBackend;

#[tokio::test]
async fn set_status_patches_the_cache_without_refetching() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();
    orders.list().await.unwrap();

    let updated = orders
        .set_status(OrderId::new(7), OrderStatus::Shipped)
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Shipped);
    // Fields missing from the backend echo are kept.
    assert_eq!(updated.user_name, "Asha Rao");
    assert_eq!(updated.items.len(), 1);
    assert_eq!(
        orders.cache().get(OrderId::new(7)).map(|o| o.status),
        Some(OrderStatus::Shipped)
    );
    assert_eq!(backend.count("GET /admin/orders"), 1);
    assert_eq!(backend.count("PUT /admin/orders/7"), 1);
    assert_eq!(backend.order(7).unwrap()["status"], "shipped");
}

#[tokio::test]
async fn repeating_a_status_change_is_harmless() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();
    orders.list().await.unwrap();

    let first = orders
        .set_status(OrderId::new(8), OrderStatus::Delivered)
        .await
        .unwrap();
    let second = orders
        .set_status(OrderId::new(8), OrderStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(orders.cache().len(), 3);
}

#[tokio::test]
async fn unlisted_order_is_rejected_locally() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();
    orders.list().await.unwrap();

    let err = orders
        .set_status(OrderId::new(99), OrderStatus::Shipped)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AdminError::Validation(ValidationError::UnknownEntity { .. })
    ));
    assert_eq!(backend.count("PUT /admin/orders/99"), 0);
}

#[tokio::test]
async fn backend_filters_by_status_on_request() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();

    let pending = orders.list_with_status(OrderStatus::Pending).await.unwrap();
    let ids: Vec<u64> = pending.iter().map(|o| o.id.as_u64()).collect();
    assert_eq!(ids, vec![7, 9]);
    assert_eq!(orders.cache().len(), 2);
}

#[tokio::test]
async fn client_filter_hides_other_statuses() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();
    orders.list().await.unwrap();

    orders.set_status_filter(Some(OrderStatus::Processing));
    let visible = orders.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible.first().map(|o| o.id), Some(OrderId::new(8)));

    let rendered = orders.table().render();
    assert!(rendered.contains("Masala Chai x1"));
    assert!(rendered.contains("2024-05-02 09:30"));
    assert!(!rendered.contains("Mango Pickle"));
}

#[tokio::test]
async fn no_orders_renders_placeholder() {
    let backend = MockBackend::spawn().await;
    backend.clear_orders();
    let console = backend.admin_console().await;
    let mut orders = console.orders().await.unwrap();

    assert!(orders.list().await.unwrap().is_empty());
    assert!(orders.cache().is_loaded());
    assert!(orders.table().render().ends_with("No orders found\n"));
}
