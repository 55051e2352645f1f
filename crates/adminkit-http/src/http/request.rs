//! Replayable request description.

use reqwest::Method;
use serde::Serialize;

use adminkit_core::Result;
use adminkit_core::error::InvalidInputError;

/// An API call that can be issued more than once.
///
/// The refresh protocol re-issues the original request after a new token is
/// obtained, so requests are kept as data rather than as a consumed builder.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add the fields of `params` as query parameters.
    ///
    /// `params` must serialize to a JSON object; `null` fields are skipped.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let value = serde_json::to_value(params).map_err(|e| InvalidInputError::Other {
            message: format!("query parameters: {}", e),
        })?;

        let serde_json::Value::Object(fields) = value else {
            return Err(InvalidInputError::Other {
                message: "query parameters must be an object".to_string(),
            }
            .into());
        };

        for (key, value) in fields {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => self.query.push((key, s)),
                other => self.query.push((key, other.to_string())),
            }
        }
        Ok(self)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Other {
            message: format!("request body: {}", e),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Per-request bookkeeping for the refresh protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryMetadata {
    /// How many times this request has been re-issued after an
    /// authorization failure.
    pub retry_count: u32,
    /// True once the request has been re-issued at least once.
    pub retried: bool,
}

impl RetryMetadata {
    /// True if another re-issue is allowed under `max`.
    pub fn can_retry(&self, max: u32) -> bool {
        self.retry_count < max
    }

    pub fn record_retry(&mut self) {
        self.retry_count += 1;
        self.retried = true;
    }
}
