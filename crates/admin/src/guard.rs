//! Access gate for resource views.

use crate::services::auth::AuthError;
use crate::session::{Session, SessionManager};

/// Proof that an admin session existed when a view was opened.
///
/// # Example
///
/// ```rust,ignore
/// let RouteGuard(session) = RouteGuard::require(&manager).await?;
/// println!("signed in as {}", session.user_id());
/// ```
#[derive(Debug, Clone)]
pub struct RouteGuard(pub Session);

impl RouteGuard {
    /// Return the current session or refuse access.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn require(session: &SessionManager) -> Result<Self, AuthError> {
        session
            .current()
            .await
            .map(Self)
            .ok_or(AuthError::NotAuthenticated)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.0
    }
}
