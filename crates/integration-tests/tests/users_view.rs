//! Integration tests for the users view.

#![allow(clippy::unwrap_used)]

use shopdesk_admin::ResourceView;
use shopdesk_admin::models::UserUpdate;
use shopdesk_core::{UserId, UserRole};
use shopdesk_integration_tests::MockBackend;

#[tokio::test]
async fn customers_are_shown_by_default() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut users = console.users().await.unwrap();

    assert_eq!(users.list().await.unwrap().len(), 4);
    assert_eq!(users.visible().len(), 3);
    assert!(users.visible().iter().all(|u| u.role == UserRole::User));

    users.set_role_filter(None);
    assert_eq!(users.visible().len(), 4);

    users.set_role_filter(Some(UserRole::Admin));
    let rendered = users.table().render();
    assert!(rendered.contains("Priya Admin"));
    assert!(!rendered.contains("Asha Rao"));
}

#[tokio::test]
async fn update_refetches_the_listing() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut users = console.users().await.unwrap();
    users.list().await.unwrap();

    let update = UserUpdate::new("Asha R. Rao", UserRole::User, Some("7 Lake View"), None).unwrap();
    let updated = users.update(UserId::new(2), &update).await.unwrap();

    assert_eq!(updated.full_name, "Asha R. Rao");
    assert_eq!(updated.address.as_deref(), Some("7 Lake View"));
    // Blank avatar leaves the stored one alone.
    assert_eq!(updated.avatar_url.as_deref(), Some("https://img.test/asha.png"));
    assert_eq!(backend.count("GET /admin/users"), 2);
}

#[tokio::test]
async fn block_and_unblock_patch_the_cached_account() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut users = console.users().await.unwrap();
    users.list().await.unwrap();

    let blocked = users.block(UserId::new(3)).await.unwrap();
    assert!(blocked.is_blocked);
    assert!(users.table().render().contains("Blocked"));

    let unblocked = users.unblock(UserId::new(3)).await.unwrap();
    assert!(!unblocked.is_blocked);
    assert_eq!(backend.count("POST /admin/users/3/block"), 1);
    assert_eq!(backend.count("POST /admin/users/3/unblock"), 1);
    assert_eq!(backend.count("GET /admin/users"), 1);
}

#[tokio::test]
async fn delete_removes_the_account() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut users = console.users().await.unwrap();
    users.list().await.unwrap();

    users.delete(UserId::new(5)).await.unwrap();
    assert!(!users.cache().contains(UserId::new(5)));

    let listed = users.list().await.unwrap();
    assert!(listed.iter().all(|u| u.id != UserId::new(5)));
}

#[tokio::test]
async fn failed_delete_reports_backend_message() {
    let backend = MockBackend::spawn().await;
    let console = backend.admin_console().await;
    let mut users = console.users().await.unwrap();
    users.list().await.unwrap();

    // A second console removes the account first.
    let other = backend.admin_console().await;
    let mut other_users = other.users().await.unwrap();
    other_users.list().await.unwrap();
    other_users.delete(UserId::new(2)).await.unwrap();

    let err = users.delete(UserId::new(2)).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to delete user: User not found");
    assert!(users.cache().contains(UserId::new(2)));
}
