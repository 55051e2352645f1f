//! Session state and the token store that owns it.

mod store;

use serde::{Deserialize, Serialize};

use crate::tokens::{AccessToken, RefreshToken};

pub use store::TokenStore;

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    /// Returns "first last", falling back to the email.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => self.email.clone(),
        }
    }
}

/// Everything the client knows about the current session.
///
/// The session is authenticated exactly when `access_token` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub role: Option<String>,
    pub user: Option<UserProfile>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// The observable authentication state for this session.
    pub fn auth_state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated {
                role: self.role.clone(),
            }
        } else {
            AuthState::Anonymous
        }
    }
}

/// Authentication state published to subscribers of a [`TokenStore`].
///
/// A transition to `Anonymous` means the user must be sent back to the
/// login entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated { role: Option<String> },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let profile = UserProfile {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
        };
        assert_eq!(profile.display_name().as_deref(), Some("Ada Lovelace"));

        let bare = UserProfile {
            email: Some("ada@example.com".into()),
            ..Default::default()
        };
        assert_eq!(bare.display_name().as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn auth_state_follows_access_token() {
        let mut state = SessionState::default();
        assert_eq!(state.auth_state(), AuthState::Anonymous);

        state.role = Some("admin".into());
        assert_eq!(state.auth_state(), AuthState::Anonymous);

        state.access_token = Some(AccessToken::new("abc"));
        assert_eq!(
            state.auth_state(),
            AuthState::Authenticated {
                role: Some("admin".into())
            }
        );
    }
}
