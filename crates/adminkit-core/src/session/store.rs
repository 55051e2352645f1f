//! In-memory session state mirrored to durable storage.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{AuthState, SessionState, UserProfile};
use crate::storage::{MemoryStorage, Storage, keys};
use crate::tokens::{AccessToken, RefreshToken};

/// Owner of the current session.
///
/// Memory is authoritative; every mutation is written through to the
/// [`Storage`] backend. Storage failures are logged and never surfaced, so
/// mutations cannot fail. The store is constructed once and shared by `Arc`
/// with every collaborator that needs the session.
///
/// # Example
///
/// ```
/// use adminkit_core::{AccessToken, TokenStore};
///
/// let store = TokenStore::in_memory();
/// store.set_access_token(AccessToken::new("abc"));
/// assert!(store.is_authenticated());
///
/// store.clear();
/// assert!(store.access_token().is_none());
/// ```
#[derive(Debug)]
pub struct TokenStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn Storage>,
    status: watch::Sender<AuthState>,
}

impl TokenStore {
    /// Create a store from whatever the storage backend holds.
    ///
    /// Absent keys are unset. An undecodable user profile is dropped.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let state = SessionState {
            access_token: read_key(storage.as_ref(), keys::ACCESS_TOKEN).map(AccessToken::new),
            refresh_token: read_key(storage.as_ref(), keys::REFRESH_TOKEN).map(RefreshToken::new),
            role: read_key(storage.as_ref(), keys::ROLE),
            user: read_key(storage.as_ref(), keys::USER).and_then(|raw| {
                serde_json::from_str::<Option<UserProfile>>(&raw)
                    .map_err(|e| warn!(error = %e, "Ignoring undecodable stored user profile"))
                    .ok()
                    .flatten()
            }),
        };

        debug!(
            authenticated = state.is_authenticated(),
            "Loaded session from storage"
        );

        let (status, _) = watch::channel(state.auth_state());
        Self {
            state: RwLock::new(state),
            storage,
            status,
        }
    }

    /// Create an empty store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    /// Subscribe to authentication state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.status.subscribe()
    }

    /// A copy of the whole session.
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.read().access_token.clone()
    }

    /// Store the access token. Subsequent requests carry it as a bearer token.
    pub fn set_access_token(&self, token: AccessToken) {
        self.update(|state| {
            self.persist(keys::ACCESS_TOKEN, token.as_str());
            state.access_token = Some(token);
        });
    }

    /// Remove the access token. Other session fields are kept.
    pub fn clear_access_token(&self) {
        self.update(|state| {
            self.forget(&[keys::ACCESS_TOKEN]);
            state.access_token = None;
        });
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read().refresh_token.clone()
    }

    pub fn set_refresh_token(&self, token: RefreshToken) {
        self.update(|state| {
            self.persist(keys::REFRESH_TOKEN, token.as_str());
            state.refresh_token = Some(token);
        });
    }

    pub fn role(&self) -> Option<String> {
        self.read().role.clone()
    }

    pub fn set_role(&self, role: impl Into<String>) {
        let role = role.into();
        self.update(|state| {
            self.persist(keys::ROLE, &role);
            state.role = Some(role);
        });
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn set_user(&self, user: UserProfile) {
        self.update(|state| {
            match serde_json::to_string(&user) {
                Ok(json) => self.persist(keys::USER, &json),
                Err(e) => warn!(error = %e, "Failed to encode user profile"),
            }
            state.user = Some(user);
        });
    }

    /// Replace the whole session, e.g. after a login.
    ///
    /// Fields absent from `session` are removed from storage.
    pub fn commit(&self, session: SessionState) {
        self.update(|state| {
            match &session.access_token {
                Some(token) => self.persist(keys::ACCESS_TOKEN, token.as_str()),
                None => self.forget(&[keys::ACCESS_TOKEN]),
            }
            match &session.refresh_token {
                Some(token) => self.persist(keys::REFRESH_TOKEN, token.as_str()),
                None => self.forget(&[keys::REFRESH_TOKEN]),
            }
            match &session.role {
                Some(role) => self.persist(keys::ROLE, role),
                None => self.forget(&[keys::ROLE]),
            }
            match session.user.as_ref().map(serde_json::to_string) {
                Some(Ok(json)) => self.persist(keys::USER, &json),
                Some(Err(e)) => warn!(error = %e, "Failed to encode user profile"),
                None => self.forget(&[keys::USER]),
            }
            *state = session;
        });
    }

    /// Remove every session field from memory and storage.
    ///
    /// Clearing an empty store is a no-op.
    pub fn clear(&self) {
        self.update(|state| {
            self.forget(&keys::ALL);
            *state = SessionState::default();
        });
        debug!("Session cleared");
    }

    /// Apply one mutation to memory and storage under the write lock, then
    /// notify subscribers.
    ///
    /// Storage is written while the lock is held so that memory and storage
    /// never disagree once the lock is released.
    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let mut state = self.write();
        f(&mut state);
        drop(state);
        self.publish();
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let next = self.read().auth_state();
        self.status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to persist session field");
        }
    }

    fn forget(&self, keys: &[&str]) {
        if let Err(e) = self.storage.remove_all(keys) {
            warn!(?keys, error = %e, "Failed to remove session fields");
        }
    }
}

fn read_key(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read session field");
            None
        }
    }
}
