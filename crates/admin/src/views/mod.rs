//! Resource views: one per backend collection.
//!
//! Every view follows the same loop. It fetches its collection into a
//! [`Collection`] cache, renders the cache (after a client-side filter) as a
//! [`DataTable`], and patches the cache from each successful mutation.
//! Mutations only accept ids present in the last listing.
//!
//! # Failure handling
//!
//! Backend calls go through [`call`], which:
//! - drops the result with `AdminError::Stale` if a login or logout happened
//!   while the request was in flight
//! - signs the session out on `401` and reports `AuthError::SessionExpired`
//! - otherwise wraps the failure with the action that was attempted
//!
//! The cache is never touched when a call fails.

mod collection;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

pub use collection::Collection;
pub use dashboard::{DashboardStats, DashboardView};
pub use orders::OrdersView;
pub use products::ProductsView;
pub use users::UsersView;

use std::future::Future;

use tracing::{debug, warn};

use crate::api::{ApiClient, HttpError};
use crate::components::{DataTable, TableColumn};
use crate::error::AdminError;
use crate::models::Entity;
use crate::services::auth::AuthError;

/// Contract shared by the resource views.
pub trait ResourceView {
    type Entity: Entity;

    /// Plural, lowercase name of the collection ("users").
    const NOUN: &'static str;

    /// The collection cache.
    fn cache(&self) -> &Collection<Self::Entity>;

    /// Cached entities that pass the view's current filter.
    fn visible(&self) -> Vec<&Self::Entity>;

    fn columns() -> Vec<TableColumn>;

    /// Cell text for one entity, in column order.
    fn row(entity: &Self::Entity) -> Vec<String>;

    /// The filtered collection as a table.
    fn table(&self) -> DataTable {
        let mut table = Self::columns()
            .into_iter()
            .fold(DataTable::new(Self::NOUN), DataTable::column);
        for entity in self.visible() {
            table.push_row(Self::row(entity));
        }
        table
    }
}

/// Run one backend call under the session epoch that was current when it
/// started.
///
/// # Errors
///
/// See the module documentation.
pub(crate) async fn call<T, F>(api: &ApiClient, action: &str, request: F) -> Result<T, AdminError>
where
    F: Future<Output = Result<T, HttpError>>,
{
    let session = api.session();
    let epoch = session.epoch();
    let result = request.await;

    if session.epoch() != epoch {
        debug!(action, "Dropping result from a previous session");
        return Err(AdminError::Stale);
    }

    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_unauthorized() => {
            session.handle_unauthorized().await;
            Err(AuthError::SessionExpired.into())
        }
        Err(e) => {
            warn!(action, error = %e, "Backend call failed");
            Err(AdminError::request(action, e))
        }
    }
}

/// Wrap a decoding failure with the action that was attempted.
pub(crate) fn schema_error(action: &str) -> impl FnOnce(HttpError) -> AdminError + '_ {
    move |e| AdminError::request(action, e)
}
