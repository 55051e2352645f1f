//! Authenticated HTTP client with transparent token refresh.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, trace, warn};

use adminkit_core::error::{AuthError, InvalidInputError, ProtocolError, TransportError};
use adminkit_core::{AccessToken, Error, RefreshToken, Result, TokenStore};

use super::endpoints::{ErrorResponse, REFRESH_TOKEN, RefreshTokenRequest, RefreshTokenResponse};
use super::request::{ApiRequest, RetryMetadata};
use crate::config::ClientConfig;
use crate::refresh::{RefreshCoordinator, Ticket};

/// Maximum number of times one request is re-issued after a 401/403.
pub const MAX_RETRIES: u32 = 3;

/// Single point of egress for API calls.
///
/// Every request carries the current access token from the shared
/// [`TokenStore`]. A 401 or 403 response runs the refresh protocol: the
/// first failing request refreshes the token, concurrent failures wait for
/// that refresh, and all of them are then re-issued with the new token.
///
/// Clients are cheap to clone and share one coordinator and token store.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<TokenStore>,
    refresh: RefreshCoordinator,
}

impl HttpClient {
    /// Create a client for `config.base_url` backed by `tokens`.
    pub fn new(config: ClientConfig, tokens: Arc<TokenStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(transport_error)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                tokens,
                refresh: RefreshCoordinator::new(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The token store this client reads from and refreshes into.
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.inner.tokens
    }

    /// True while a token refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Issue an authenticated request and decode the JSON response.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let response = self.dispatch(&request).await?;
        self.handle_response(response).await
    }

    /// Issue an authenticated request whose response body is ignored.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send_no_content(&self, request: ApiRequest) -> Result<()> {
        let response = self.dispatch(&request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Refresh the access token now, joining any refresh already in flight.
    pub async fn refresh(&self) -> Result<AccessToken> {
        self.await_refresh().await
    }

    /// POST without a bearer token and without the refresh protocol.
    ///
    /// Used for the login and refresh endpoints themselves.
    #[instrument(skip(self, body))]
    pub(crate) async fn post_public<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.inner.config.base_url.endpoint(path);
        debug!(%url, "Public request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Issue `request`, running the refresh protocol on 401/403.
    ///
    /// Returns the first response that is not an authorization failure.
    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let mut retry = RetryMetadata::default();
        let mut token = self.inner.tokens.access_token();

        loop {
            let response = self.execute(request, token.as_ref()).await?;
            let status = response.status();
            if !is_auth_failure(status) {
                return Ok(response);
            }

            debug!(%status, retry_count = retry.retry_count, "Authorization failed");

            if !retry.can_retry(MAX_RETRIES) {
                warn!(attempts = retry.retry_count, "Giving up after repeated authorization failures");
                return Err(AuthError::MaxRetriesReached {
                    attempts: retry.retry_count,
                }
                .into());
            }
            retry.record_retry();

            // Another caller may have refreshed while this request was in
            // flight; replay with the newer token instead of refreshing again.
            let current = self.inner.tokens.access_token();
            if current.is_some() && current != token {
                trace!("Replaying with token refreshed by another request");
                token = current;
                continue;
            }

            token = Some(self.await_refresh().await?);
        }
    }

    /// Become the refresh initiator, or wait for the one in flight.
    async fn await_refresh(&self) -> Result<AccessToken> {
        match self.inner.refresh.enter() {
            Ticket::Queued(rx) => {
                trace!("Waiting for in-flight refresh");
                rx.await
                    .unwrap_or_else(|_| Err(AuthError::RefreshAborted.into()))
            }
            Ticket::Initiator(guard) => {
                let outcome = self.run_refresh().await;
                match &outcome {
                    Ok(_) => info!("Access token refreshed"),
                    Err(e) => {
                        warn!(error = %e, "Token refresh failed, clearing session");
                        self.inner.tokens.clear();
                    }
                }
                guard.settle(&outcome);
                outcome
            }
        }
    }

    /// Call the refresh endpoint and commit the new token.
    #[instrument(skip(self))]
    async fn run_refresh(&self) -> Result<AccessToken> {
        let refresh_token = self
            .inner
            .tokens
            .refresh_token()
            .ok_or(AuthError::RefreshTokenMissing)?;

        let request = RefreshTokenRequest {
            refresh_token: refresh_token.as_str(),
        };

        let timeout = self.inner.config.refresh_timeout;
        let response: RefreshTokenResponse =
            match tokio::time::timeout(timeout, self.post_public(REFRESH_TOKEN, &request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return Err(AuthError::RefreshFailed(Box::new(e)).into()),
                Err(_) => {
                    return Err(AuthError::RefreshTimeout {
                        duration_ms: whole_millis(timeout),
                    }
                    .into());
                }
            };

        let access_token = AccessToken::new(response.access_token);
        self.inner.tokens.set_access_token(access_token.clone());
        if let Some(rotated) = response.refresh_token {
            self.inner.tokens.set_refresh_token(RefreshToken::new(rotated));
        }

        Ok(access_token)
    }

    /// Send one attempt of `request` with `token` as the bearer credential.
    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::Response> {
        let url = self.inner.config.base_url.endpoint(&request.path);
        trace!(method = %request.method, %url, authed = token.is_some(), "Sending request");

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            let value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                InvalidInputError::Other {
                    message: "access token contains invalid header characters".to_string(),
                }
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }

        builder.send().await.map_err(transport_error)
    }

    /// Handle a response, decoding the body or the error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(%status, "Response");

        if status.is_success() {
            response.json::<R>().await.map_err(|e| {
                InvalidInputError::Decode {
                    what: "response body".to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Parse an API error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.message, body.errors),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.config.base_url)
            .field("refreshing", &self.inner.refresh.is_refreshing())
            .finish()
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Milliseconds in `d`, clamped to `u64::MAX`.
fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Http { message }
    };
    err.into()
}
