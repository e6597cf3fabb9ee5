//! Admin authentication service.
//!
//! Exchanges email and password for an access token, then hands the token to
//! the session manager, which only accepts tokens carrying the admin role.
//! Nothing is persisted unless the whole exchange succeeds.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shopdesk_core::Email;
use tracing::{instrument, warn};

use crate::api::{ApiClient, HttpError};
use crate::error::{AdminError, ValidationError};
use crate::session::{Session, SessionError, TokenError};

const LOGIN_PATH: &str = "/auth/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Admin authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in and start an admin session.
    ///
    /// # Errors
    ///
    /// - `AdminError::Validation` if the email is malformed or the password empty
    /// - `AuthError::Rejected` with the backend's message if it refuses the credentials
    /// - `AuthError::InvalidToken` if the issued token cannot be decoded
    /// - `AuthError::NotAdmin` if the account is not an administrator
    /// - `AuthError::LoginFailed` for any other failure
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AdminError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        if password.expose_secret().is_empty() {
            return Err(ValidationError::Required("Password").into());
        }

        let request = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self
            .api
            .post(LOGIN_PATH, &request)
            .await
            .map_err(login_failure)?;

        let token = SecretString::from(response.access_token);
        match self.api.session().login(token).await {
            Ok(session) => Ok(session),
            Err(SessionError::Token(TokenError::NotAdmin { role })) => {
                warn!(%role, "Refusing non-admin account");
                Err(AuthError::NotAdmin.into())
            }
            Err(SessionError::Token(TokenError::Malformed(reason))) => {
                warn!(%reason, "Backend issued an undecodable token");
                Err(AuthError::InvalidToken.into())
            }
            Err(SessionError::Store(e)) => Err(e.into()),
        }
    }

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SessionStore` if persisted storage cannot be cleared.
    pub async fn logout(&self) -> Result<(), AdminError> {
        self.api.session().logout().await.map_err(|e| match e {
            SessionError::Store(e) => AdminError::SessionStore(e),
            SessionError::Token(_) => AdminError::Auth(AuthError::InvalidToken),
        })
    }
}

fn login_failure(err: HttpError) -> AdminError {
    warn!(error = %err, "Login request failed");
    let auth = match err {
        HttpError::Status { message, .. } if !message.trim().is_empty() => {
            AuthError::Rejected(message)
        }
        HttpError::Schema(_) => AuthError::InvalidToken,
        _ => AuthError::LoginFailed,
    };
    auth.into()
}
