//! Client configuration.

use std::time::Duration;

use adminkit_core::ApiUrl;

/// Default bound on a token refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings fixed when an [`HttpClient`](crate::HttpClient) is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined to.
    pub base_url: ApiUrl,
    /// How long a refresh may take before it counts as failed.
    pub refresh_timeout: Duration,
    /// Overall timeout for ordinary requests, if any.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            request_timeout: None,
            user_agent: concat!("adminkit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
