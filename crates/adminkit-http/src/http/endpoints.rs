//! Endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Password login.
pub const LOGIN: &str = "login";

/// Access token renewal.
pub const REFRESH_TOKEN: &str = "refresh-token";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

/// Session fields inside the login response.
///
/// Token fields are snake_case while profile fields are camelCase.
#[derive(Debug, Default, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, rename = "roleName")]
    pub role_name: Option<String>,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
}

/// Request body for refresh-token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from refresh-token.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    /// Some deployments rotate the refresh token as well.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Single-entity and unpaginated list responses.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}
