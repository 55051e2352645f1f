//! Error types for adminkit.
//!
//! A single error type with explicit variants for transport, authentication,
//! protocol, storage and input validation failures. Every variant is `Clone`
//! so that one refresh outcome can be handed to every request queued on it.

use std::fmt;
use thiserror::Error;

/// The unified error type for adminkit operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication and session lifecycle errors.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP responses that are not handled by the session layer.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad URLs, undecodable payloads).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Durable storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(e) => Some(e.status),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The login endpoint rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No access token is present.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session role does not grant access.
    #[error("forbidden: requires one of [{}]", required.join(", "))]
    Forbidden { required: Vec<String> },

    /// A request kept failing authorization after repeated refreshes.
    #[error("max retries reached after {attempts} attempts")]
    MaxRetriesReached { attempts: u32 },

    /// No refresh token is available to renew the session.
    #[error("no refresh token available")]
    RefreshTokenMissing,

    /// The refresh endpoint failed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(Box<Error>),

    /// The refresh endpoint did not answer in time.
    #[error("token refresh timed out after {duration_ms}ms")]
    RefreshTimeout { duration_ms: u64 },

    /// The refresh was abandoned before it settled.
    #[error("token refresh aborted")]
    RefreshAborted,

    /// The login response did not carry a required field.
    #[error("malformed login response: missing {field}")]
    MalformedLoginResponse { field: &'static str },
}

/// Protocol-level errors from non-success HTTP responses.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, if any.
    pub message: Option<String>,
    /// Field validation errors from the server, if any.
    pub errors: Option<serde_json::Value>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>, errors: Option<serde_json::Value>) -> Self {
        Self {
            status,
            message,
            errors,
        }
    }

    /// Check if this status triggers the refresh protocol.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A response or stored value could not be decoded.
    #[error("could not decode {what}: {reason}")]
    Decode { what: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Durable storage errors.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The storage file is not valid JSON.
    #[error("corrupt storage file {path}: {message}")]
    Corrupt { path: String, message: String },
}
