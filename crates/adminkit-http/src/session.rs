//! Session facade over the HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use adminkit_core::error::AuthError;
use adminkit_core::session::{AuthState, SessionState, UserProfile};
use adminkit_core::storage::Storage;
use adminkit_core::traits::Authenticator;
use adminkit_core::{
    AccessToken, Credentials, Error, Permission, Record, RefreshToken, ResourceKind, Result,
    Role, TokenStore, User,
};

use crate::config::ClientConfig;
use crate::http::{HttpClient, LOGIN, LoginData, LoginRequest, LoginResponse};
use crate::resource::{Resource, ResourceStore};

/// The application's view of the authenticated session.
///
/// Wraps an [`HttpClient`] and its [`TokenStore`]; every collaborator that
/// needs the session (resource stores, route guards, the CLI) is handed a
/// clone of this value.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use adminkit_core::{ApiUrl, Authenticator, Credentials, MemoryStorage};
/// use adminkit_http::{ClientConfig, HttpSession};
///
/// # async fn example() -> Result<(), adminkit_core::Error> {
/// let config = ClientConfig::new(ApiUrl::new("https://crm.example.com/api/v1")?);
/// let session = HttpSession::connect(config, Arc::new(MemoryStorage::new()))?;
///
/// session.login(Credentials::new("ada@example.com", "secret")).await?;
/// assert!(session.is_authenticated());
///
/// let users = session.users();
/// let page = users.fetch(Default::default()).await?;
/// println!("{} users", page.total);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpSession {
    client: HttpClient,
}

impl HttpSession {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build a client whose session is loaded from, and persisted to, `storage`.
    pub fn connect(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let tokens = Arc::new(TokenStore::load(storage));
        Ok(Self::new(HttpClient::new(config, tokens)?))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Subscribe to authentication state changes.
    ///
    /// A change to [`AuthState::Anonymous`] (logout or failed refresh) is the
    /// signal to send the user back to the login entry point.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.client.tokens().subscribe()
    }

    /// A copy of the whole session.
    pub fn snapshot(&self) -> SessionState {
        self.client.tokens().snapshot()
    }

    /// Renew the access token using the stored refresh token.
    ///
    /// On failure the session is cleared.
    pub async fn refresh(&self) -> Result<()> {
        self.client.refresh().await.map(|_| ())
    }

    /// A CRUD handle on any collection.
    pub fn resource<T>(&self, kind: ResourceKind) -> Resource<T>
    where
        T: adminkit_core::Entity,
    {
        Resource::new(self.client.clone(), kind)
    }

    pub fn users(&self) -> ResourceStore<User> {
        ResourceStore::new(self.resource(ResourceKind::Users))
    }

    pub fn roles(&self) -> ResourceStore<Role> {
        ResourceStore::new(self.resource(ResourceKind::Roles))
    }

    pub fn permissions(&self) -> ResourceStore<Permission> {
        ResourceStore::new(self.resource(ResourceKind::Permissions))
    }

    /// A store for one of the schema-agnostic collections
    /// (customers, leads, projects, tasks).
    pub fn records(&self, kind: ResourceKind) -> ResourceStore<Record> {
        ResourceStore::new(self.resource(kind))
    }
}

#[async_trait]
impl Authenticator for HttpSession {
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn login(&self, credentials: Credentials) -> Result<()> {
        info!("Logging in");

        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let outcome = self
            .client
            .post_public::<_, LoginResponse>(LOGIN, &request)
            .await
            .map_err(|e| match e {
                Error::Protocol(p) if p.status == 401 => AuthError::InvalidCredentials.into(),
                other => other,
            })
            .and_then(|response| session_from_login(response.data, credentials.email()));

        match outcome {
            Ok(session) => {
                self.client.tokens().commit(session);
                debug!("Login succeeded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.client.tokens().clear();
                Err(e)
            }
        }
    }

    fn logout(&self) {
        info!("Logging out");
        self.client.tokens().clear();
    }

    fn is_authenticated(&self) -> bool {
        self.client.tokens().is_authenticated()
    }

    fn access_token(&self) -> Option<AccessToken> {
        self.client.tokens().access_token()
    }

    fn role(&self) -> Option<String> {
        self.client.tokens().role()
    }

    fn user(&self) -> Option<UserProfile> {
        self.client.tokens().user()
    }
}

/// Build the session from a login response.
///
/// The access token and role are required; a response without them is a
/// failed login.
fn session_from_login(data: LoginData, email: &str) -> Result<SessionState> {
    let access_token = data
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedLoginResponse {
            field: "access_token",
        })?;
    let role = data.role_name.ok_or(AuthError::MalformedLoginResponse {
        field: "roleName",
    })?;

    Ok(SessionState {
        access_token: Some(AccessToken::new(access_token)),
        refresh_token: data.refresh_token.map(RefreshToken::new),
        role: Some(role),
        user: Some(UserProfile {
            first_name: data.first_name,
            last_name: data.last_name,
            email: Some(email.to_string()),
        }),
    })
}
