//! Authenticated session: token decoding, persistence and lifecycle.

mod manager;
mod store;
pub mod token;

pub use manager::{Session, SessionError, SessionManager, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore, SessionStoreError};
pub use token::{TokenClaims, TokenError};
