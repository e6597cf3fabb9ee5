//! REST client for the store backend.
//!
//! Every request goes through [`ApiClient`], which prefixes the configured
//! base URL, attaches the bearer token of the injected session, and turns
//! non-2xx responses and malformed bodies into [`HttpError`].
//!
//! # Response shapes
//!
//! The backend is not uniform: some list endpoints wrap their items in an
//! envelope (`{"products": [...]}`) and others return a bare array. The
//! [`envelope`] helpers accept both and validate the item schema.

pub mod client;
pub mod envelope;

pub use client::ApiClient;
pub use reqwest::Method;
pub use envelope::{decode_item, decode_list};

use thiserror::Error;

/// Errors produced by the HTTP layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: u16,
        /// Server-provided error text, or the status reason phrase.
        message: String,
    },

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response body did not match the expected schema.
    #[error("unexpected response: {0}")]
    Schema(String),

    /// A request URL could not be built.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HttpError {
    /// Status code of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            Self::Network(_) | Self::Schema(_) | Self::Url(_) => None,
        }
    }

    /// Whether the backend rejected the bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Human-readable message without the error category prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
