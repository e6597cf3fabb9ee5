//! Unified error handling for the admin console.

use shopdesk_core::EmailError;
use thiserror::Error;

use crate::api::HttpError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::session::SessionStoreError;

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// A numeric field is below zero.
    #[error("{0} cannot be negative")]
    Negative(&'static str),

    /// An update carries no fields.
    #[error("No valid fields to update")]
    NothingToUpdate,

    /// The id is not present in the loaded collection.
    #[error("{noun} {id} not found")]
    UnknownEntity {
        /// Singular entity name, capitalized ("User", "Order").
        noun: &'static str,
        id: String,
    },

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Application-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A backend call failed. `action` is the user-facing context.
    #[error("{action}: {source}")]
    Request {
        action: String,
        #[source]
        source: HttpError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Session storage error: {0}")]
    SessionStore(#[from] SessionStoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session changed while the request was in flight.
    #[error("Result discarded: session changed during request")]
    Stale,
}

impl From<HttpError> for AdminError {
    fn from(source: HttpError) -> Self {
        Self::request("Request failed", source)
    }
}

impl AdminError {
    pub(crate) fn request(action: impl Into<String>, source: HttpError) -> Self {
        Self::Request {
            action: action.into(),
            source,
        }
    }

    /// Text suitable for showing to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { action, source } => match source {
                HttpError::Status { message, .. } => format!("{action}: {message}"),
                HttpError::Network(_) => format!("{action}: backend unreachable"),
                other => format!("{action}: {other}"),
            },
            other => other.to_string(),
        }
    }

    /// Whether the error means the operator must sign in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::NotAuthenticated | AuthError::SessionExpired)
        )
    }
}
