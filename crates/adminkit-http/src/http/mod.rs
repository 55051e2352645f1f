//! HTTP client implementation.
//!
//! This module provides the single egress point for API calls: bearer token
//! injection on the way out and the refresh protocol on the way back.

mod client;
mod endpoints;
mod request;

pub use client::{HttpClient, MAX_RETRIES};
pub(crate) use endpoints::*;
pub use request::{ApiRequest, RetryMetadata};
