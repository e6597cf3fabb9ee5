//! Entry point tying the client, session and views together.

use std::sync::Arc;

use secrecy::SecretString;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::AdminError;
use crate::guard::RouteGuard;
use crate::services::auth::AuthService;
use crate::session::{FileSessionStore, Session, SessionManager};
use crate::views::{DashboardView, OrdersView, ProductsView, UsersView};

/// The admin console.
///
/// Views are only handed out while an admin session exists.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    api: ApiClient,
    auth: AuthService,
}

impl AdminConsole {
    /// Console over an existing session manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, AdminError> {
        let api = ApiClient::new(config, session)?;
        Ok(Self {
            auth: AuthService::new(api.clone()),
            api,
        })
    }

    /// Console that resumes the session persisted on disk.
    ///
    /// Uses `config.session_file` or the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or the HTTP client
    /// cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self, AdminError> {
        let store = match &config.session_file {
            Some(path) => FileSessionStore::new(path),
            None => FileSessionStore::default_location()?,
        };
        let session = SessionManager::restore(store)?;
        Self::new(config, Arc::new(session))
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        self.api.session()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// See [`AuthService::login`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AdminError> {
        self.auth.login(email, password).await
    }

    /// Sign out and forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be removed.
    pub async fn logout(&self) -> Result<(), AdminError> {
        self.auth.logout().await
    }

    /// The signed-in session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn whoami(&self) -> Result<Session, AdminError> {
        let RouteGuard(session) = RouteGuard::require(self.session()).await?;
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn users(&self) -> Result<UsersView, AdminError> {
        RouteGuard::require(self.session()).await?;
        Ok(UsersView::new(self.api.clone()))
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn products(&self) -> Result<ProductsView, AdminError> {
        RouteGuard::require(self.session()).await?;
        Ok(ProductsView::new(self.api.clone()))
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn orders(&self) -> Result<OrdersView, AdminError> {
        RouteGuard::require(self.session()).await?;
        Ok(OrdersView::new(self.api.clone()))
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is signed in.
    pub async fn dashboard(&self) -> Result<DashboardView, AdminError> {
        RouteGuard::require(self.session()).await?;
        Ok(DashboardView::new(self.api.clone()))
    }
}
