//! Navigation guards.

use tracing::debug;

use crate::error::AuthError;
use crate::traits::Authenticator;
use crate::Result;

/// Fails with [`AuthError::NotAuthenticated`] unless a session is active.
pub fn require_authenticated(auth: &dyn Authenticator) -> Result<()> {
    if auth.is_authenticated() {
        Ok(())
    } else {
        debug!("Guard rejected anonymous session");
        Err(AuthError::NotAuthenticated.into())
    }
}

/// Fails unless a session is active and its role is one of `roles`.
pub fn require_role(auth: &dyn Authenticator, roles: &[&str]) -> Result<()> {
    require_authenticated(auth)?;

    match auth.role() {
        Some(role) if roles.contains(&role.as_str()) => Ok(()),
        role => {
            debug!(?role, ?roles, "Guard rejected role");
            Err(AuthError::Forbidden {
                required: roles.iter().map(|r| r.to_string()).collect(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;
    use crate::{AccessToken, Credentials, Error, TokenStore};
    use async_trait::async_trait;

    struct Fixed(TokenStore);

    #[async_trait]
    impl Authenticator for Fixed {
        async fn login(&self, _credentials: Credentials) -> Result<()> {
            Ok(())
        }

        fn logout(&self) {
            self.0.clear();
        }

        fn is_authenticated(&self) -> bool {
            self.0.is_authenticated()
        }

        fn access_token(&self) -> Option<AccessToken> {
            self.0.access_token()
        }

        fn role(&self) -> Option<String> {
            self.0.role()
        }

        fn user(&self) -> Option<UserProfile> {
            self.0.user()
        }
    }

    fn signed_in(role: &str) -> Fixed {
        let store = TokenStore::in_memory();
        store.set_access_token(AccessToken::new("abc"));
        store.set_role(role);
        Fixed(store)
    }

    #[test]
    fn anonymous_is_rejected() {
        let auth = Fixed(TokenStore::in_memory());
        assert!(matches!(
            require_authenticated(&auth),
            Err(Error::Auth(AuthError::NotAuthenticated))
        ));
        assert!(matches!(
            require_role(&auth, &["admin"]),
            Err(Error::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[test]
    fn matching_role_passes() {
        let auth = signed_in("manager");
        assert!(require_role(&auth, &["admin", "manager"]).is_ok());
    }

    #[test]
    fn other_role_is_forbidden() {
        let auth = signed_in("sales");
        assert!(matches!(
            require_role(&auth, &["admin"]),
            Err(Error::Auth(AuthError::Forbidden { .. }))
        ));
    }

    #[test]
    fn logout_closes_the_gate() {
        let auth = signed_in("admin");
        auth.logout();
        assert!(require_authenticated(&auth).is_err());
    }
}
