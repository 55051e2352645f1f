//! Session facade trait.

use async_trait::async_trait;

use crate::session::UserProfile;
use crate::{AccessToken, Credentials, Result};

/// Login, logout and session queries, as seen by the rest of the application.
///
/// Resource modules read the access token through this trait, and route
/// guards gate on [`is_authenticated`](Authenticator::is_authenticated) and
/// [`role`](Authenticator::role).
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate and establish a new session.
    ///
    /// On failure no session state survives.
    async fn login(&self, credentials: Credentials) -> Result<()>;

    /// End the session.
    fn logout(&self);

    /// True iff an access token is present.
    fn is_authenticated(&self) -> bool;

    /// The current access token, if any.
    fn access_token(&self) -> Option<AccessToken>;

    /// The role name of the signed-in user, if known.
    fn role(&self) -> Option<String>;

    /// The profile of the signed-in user, if known.
    fn user(&self) -> Option<UserProfile>;
}
