//! Integration tests for the products view.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use shopdesk_admin::models::{NewProduct, ProductUpdate};
use shopdesk_admin::{AdminError, ResourceView, ValidationError};
use shopdesk_core::{Price, ProductId};
use shopdesk_integration_tests::MockBackend;

#[tokio::test]
async fn category_filter_is_applied_to_the_cache() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();

    assert_eq!(view.list().await.unwrap().len(), 3);
    view.set_category_filter(Some("pantry"));

    let visible = view.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Mango Pickle");
    assert_eq!(backend.count("GET /admin/products"), 1);

    view.set_category_filter(None);
    assert_eq!(view.visible().len(), 3);
    assert_eq!(view.categories(), vec!["Beverages", "Pantry"]);
}

#[tokio::test]
async fn create_adds_the_returned_product() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    let new = NewProduct::new("Jaggery", Price::from_minor(12_000), 25)
        .unwrap()
        .category(Some("Pantry"));
    let created = view.create(&new).await.unwrap();

    assert_eq!(created.id, ProductId::new(4));
    assert_eq!(created.price, Price::from_minor(12_000));
    assert!(view.cache().contains(created.id));
    assert_eq!(view.cache().len(), 4);
    assert_eq!(backend.count("GET /admin/products"), 1);
}

#[tokio::test]
async fn update_patches_only_the_changed_product() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    let update = ProductUpdate {
        stock_quantity: Some(0),
        price: Some(Price::from_minor(8_900)),
        ..ProductUpdate::default()
    };
    let updated = view.update(ProductId::new(2), &update).await.unwrap();

    assert_eq!(updated.stock_quantity, 0);
    assert_eq!(updated.price, Price::from_minor(8_900));
    assert_eq!(updated.name, "Masala Chai");
    assert_eq!(view.cache().get(ProductId::new(2)), Some(&updated));
}

#[tokio::test]
async fn empty_update_is_rejected_locally() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    let err = view
        .update(ProductId::new(1), &ProductUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "No valid fields to update");
    assert_eq!(backend.count("PUT /admin/products/1"), 0);
}

#[tokio::test]
async fn deleted_product_is_gone_from_cache_and_listing() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    view.delete(ProductId::new(3)).await.unwrap();
    assert!(!view.cache().contains(ProductId::new(3)));

    let listed = view.list().await.unwrap();
    assert!(listed.iter().all(|p| p.id != ProductId::new(3)));
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn mutations_require_a_listed_id() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    let err = view.delete(ProductId::new(42)).await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::Validation(ValidationError::UnknownEntity { noun: "Product", .. })
    ));
    assert_eq!(err.user_message(), "Product 42 not found");
    assert_eq!(backend.count("DELETE /admin/products/42"), 0);
}

#[tokio::test]
async fn backend_error_leaves_cache_untouched() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    // Removed on the server after the listing.
    backend.set_products(&[json!({
        "id": 1, "name": "Mango Pickle", "price": 249.5, "stock_quantity": 12, "category": "Pantry"
    })]);

    let err = view.delete(ProductId::new(2)).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to delete product: Product not found");
    assert_eq!(view.cache().len(), 3);
}

#[tokio::test]
async fn empty_catalog_renders_placeholder() {
    let backend = MockBackend::spawn().await;
    backend.set_products(&[]);
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();

    assert!(view.list().await.unwrap().is_empty());
    let rendered = view.table().render();
    assert_eq!(rendered.lines().last(), Some("No products found"));
    assert_eq!(rendered.lines().count(), 3);
}

#[tokio::test]
async fn filter_with_no_match_renders_placeholder() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut view = console.products().await.unwrap();
    view.list().await.unwrap();

    view.set_category_filter(Some("Snacks"));
    assert!(view.table().render().ends_with("No products found\n"));
}
