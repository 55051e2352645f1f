//! adminkit-http - Authenticated HTTP client for the adminkit API.
//!
//! All API traffic flows through an [`HttpClient`], which attaches the
//! current bearer token and transparently refreshes it when the API answers
//! 401 or 403. Concurrent failures share a single refresh. [`HttpSession`]
//! is the facade the rest of the application talks to.

mod config;
mod http;
mod refresh;
mod resource;
mod session;

pub use config::{ClientConfig, DEFAULT_REFRESH_TIMEOUT};
pub use http::{ApiRequest, HttpClient, MAX_RETRIES, RetryMetadata};
pub use refresh::{RefreshCoordinator, RefreshGuard, Ticket};
pub use resource::{Resource, ResourceStore};
pub use session::HttpSession;
