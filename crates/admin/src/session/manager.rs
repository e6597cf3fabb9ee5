//! In-memory session state backed by a [`SessionStore`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use shopdesk_core::UserRole;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::store::{MemorySessionStore, PersistedSession, SessionStore, SessionStoreError};
use super::token::{TokenError, decode_admin_claims};

/// Errors raised while changing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// An authenticated administrator session.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    role: UserRole,
    user_id: String,
    expires_at: Option<i64>,
}

impl Session {
    fn from_token(token: SecretString) -> Result<Self, TokenError> {
        let claims = decode_admin_claims(token.expose_secret())?;
        Ok(Self {
            token,
            role: claims.role,
            user_id: claims.user_id,
            expires_at: claims.expires_at,
        })
    }

    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `exp` claim (unix seconds), if the token carries one.
    #[must_use]
    pub const fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Whether the token's `exp` claim is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| exp <= Utc::now().timestamp())
    }

    fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            token: self.token.expose_secret().to_string(),
            role: self.role.as_str().to_string(),
            user_id: self.user_id.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Owns the current session and keeps it in sync with durable storage.
///
/// Every login and logout advances an epoch counter. Requests record the
/// epoch before they go out; a result that comes back under a different
/// epoch belongs to a session that no longer exists and is dropped.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
    epoch: AtomicU64,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Manager starting anonymous over `store`, ignoring anything persisted.
    #[must_use]
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            current: RwLock::new(None),
            epoch: AtomicU64::new(0),
        }
    }

    /// Anonymous manager with nothing persisted beyond the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Manager that resumes the session persisted in `store`.
    ///
    /// A persisted token that no longer decodes to an admin session is
    /// cleared and the manager starts anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn restore(store: impl SessionStore + 'static) -> Result<Self, SessionStoreError> {
        let persisted = match store.load() {
            Ok(persisted) => persisted,
            Err(SessionStoreError::Corrupt(e)) => {
                warn!(error = %e, "Discarding corrupt session file");
                store.clear()?;
                None
            }
            Err(e) => return Err(e),
        };

        let session = match persisted {
            Some(p) => match Session::from_token(SecretString::from(p.token)) {
                Ok(session) if !session.is_expired() => Some(session),
                Ok(_) => {
                    info!("Persisted session has expired; starting signed out");
                    store.clear()?;
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Discarding invalid persisted session");
                    store.clear()?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            store: Box::new(store),
            current: RwLock::new(session),
            epoch: AtomicU64::new(0),
        })
    }

    /// Install `token` as the current session.
    ///
    /// The token must decode to an admin role. On any failure nothing is
    /// persisted and the previous state is kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Token` if the token is malformed or not an
    /// admin token, and `SessionError::Store` if it cannot be persisted.
    #[instrument(skip_all)]
    pub async fn login(&self, token: SecretString) -> Result<Session, SessionError> {
        let session = Session::from_token(token)?;

        self.store.save(&session.to_persisted())?;

        let mut current = self.current.write().await;
        *current = Some(session.clone());
        self.epoch.fetch_add(1, Ordering::SeqCst);
        drop(current);

        info!(user_id = %session.user_id, "Admin session started");
        Ok(session)
    }

    /// Forget the current session in memory and in storage.
    ///
    /// The in-memory session is cleared even if the store fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if persisted storage cannot be removed.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        let had_session = current.take().is_some();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        drop(current);

        self.store.clear()?;
        if had_session {
            info!("Admin session ended");
        }
        Ok(())
    }

    /// Drop the session after the backend rejected its token.
    pub async fn handle_unauthorized(&self) {
        warn!("Backend rejected the session token; signing out");
        if let Err(e) = self.logout().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    /// The current session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Bearer token of the current session, if any.
    pub async fn token(&self) -> Option<SecretString> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn state(&self) -> SessionState {
        if self.current.read().await.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Counter advanced by every login and logout.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::session::token::encode_test_token;

    fn admin_token(id: u64) -> SecretString {
        SecretString::from(encode_test_token(&json!({"userId": id, "role": "admin"})))
    }

    struct SharedStore(Arc<MemorySessionStore>);

    impl SessionStore for SharedStore {
        fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
            self.0.load()
        }
        fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
            self.0.save(session)
        }
        fn clear(&self) -> Result<(), SessionStoreError> {
            self.0.clear()
        }
    }

    #[tokio::test]
    async fn test_login_persists_triple_and_advances_epoch() {
        let backing = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(SharedStore(backing.clone()));
        assert_eq!(manager.state().await, SessionState::Anonymous);

        let session = manager.login(admin_token(7)).await.unwrap();
        assert_eq!(session.user_id(), "7");
        assert_eq!(manager.state().await, SessionState::Authenticated);
        assert_eq!(manager.epoch(), 1);

        let persisted = backing.load().unwrap().unwrap();
        assert_eq!(persisted.role, "admin");
        assert_eq!(persisted.user_id, "7");
    }

    #[tokio::test]
    async fn test_non_admin_login_persists_nothing() {
        let backing = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(SharedStore(backing.clone()));
        let token = SecretString::from(encode_test_token(&json!({"userId": 5, "role": "user"})));

        let err = manager.login(token).await.unwrap_err();
        assert!(matches!(err, SessionError::Token(TokenError::NotAdmin { .. })));
        assert!(backing.load().unwrap().is_none());
        assert!(manager.current().await.is_none());
        assert_eq!(manager.epoch(), 0);
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
            Ok(None)
        }
        fn save(&self, _session: &PersistedSession) -> Result<(), SessionStoreError> {
            Err(std::io::Error::other("disk full").into())
        }
        fn clear(&self) -> Result<(), SessionStoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_previous_state() {
        let manager = SessionManager::new(FailingStore);

        let err = manager.login(admin_token(4)).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(SessionStoreError::Io(_))));
        assert_eq!(manager.state().await, SessionState::Anonymous);
        assert_eq!(manager.epoch(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let backing = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(SharedStore(backing.clone()));
        manager.login(admin_token(1)).await.unwrap();

        manager.logout().await.unwrap();
        assert!(manager.token().await.is_none());
        assert!(backing.load().unwrap().is_none());
        assert_eq!(manager.epoch(), 2);
    }

    #[tokio::test]
    async fn test_restore_resumes_valid_session() {
        let backing = MemorySessionStore::with_session(PersistedSession {
            token: encode_test_token(&json!({"userId": 3, "role": "admin"})),
            role: "admin".to_string(),
            user_id: "3".to_string(),
        });
        let manager = SessionManager::restore(backing).unwrap();
        assert_eq!(manager.current().await.unwrap().user_id(), "3");
    }

    #[tokio::test]
    async fn test_restore_discards_invalid_and_expired_tokens() {
        for token in [
            "garbage".to_string(),
            encode_test_token(&json!({"userId": 3, "role": "user"})),
            encode_test_token(&json!({"userId": 3, "role": "admin", "exp": 1})),
        ] {
            let backing = Arc::new(MemorySessionStore::with_session(PersistedSession {
                token,
                role: "admin".to_string(),
                user_id: "3".to_string(),
            }));
            let manager = SessionManager::restore(SharedStore(backing.clone())).unwrap();
            assert!(manager.current().await.is_none());
            assert!(backing.load().unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_handle_unauthorized_signs_out() {
        let manager = SessionManager::in_memory();
        manager.login(admin_token(1)).await.unwrap();
        manager.handle_unauthorized().await;
        assert_eq!(manager.state().await, SessionState::Anonymous);
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::from_token(admin_token(9)).unwrap();
        let debug = format!("{session:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(session.token().expose_secret()));
    }
}
