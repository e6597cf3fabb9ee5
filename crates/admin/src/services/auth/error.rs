//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur while signing in or checking access.
///
/// The `Display` text is what the console shows the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend issued a token that could not be decoded.
    #[error("Invalid token received")]
    InvalidToken,

    /// The token belongs to an account without the admin role.
    #[error("Access denied. Admin privileges required.")]
    NotAdmin,

    /// The backend refused the credentials and said why.
    #[error("{0}")]
    Rejected(String),

    /// Sign-in failed without a usable reason.
    #[error("Login failed")]
    LoginFailed,

    /// A protected view was opened without a session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The backend rejected the stored token.
    #[error("Session expired. Please log in again.")]
    SessionExpired,
}
