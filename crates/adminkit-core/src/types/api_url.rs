//! API base URL type.

use std::fmt;

use url::{Host, Url};

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the admin REST API.
///
/// Endpoint paths are appended to it verbatim, so it must be an absolute
/// `https` URL without credentials, query or fragment. Plain `http` is
/// accepted for loopback hosts only.
///
/// # Example
///
/// ```
/// use adminkit_core::ApiUrl;
///
/// let api = ApiUrl::new("http://localhost:8000/api/v1/").unwrap();
/// assert_eq!(api.endpoint("login"), "http://localhost:8000/api/v1/login");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// API location used by local development servers.
    pub const DEFAULT: &'static str = "http://localhost:8000/api/v1";

    /// Parse and validate a base URL.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let url = Url::parse(s).map_err(|e| reject(&e.to_string()))?;

        let Some(host) = url.host() else {
            return Err(reject("must have a host"));
        };
        match url.scheme() {
            "https" => {}
            "http" if is_loopback(&host) => {}
            _ => return Err(reject("must use HTTPS (HTTP allowed only for loopback)")),
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(reject("must not embed credentials"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(reject("must not carry a query or fragment"));
        }

        Ok(Self(url))
    }

    /// Returns the full URL for an endpoint path relative to the base.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => *name == "localhost",
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(s: &str) -> String {
        match ApiUrl::new(s) {
            Err(Error::InvalidInput(InvalidInputError::ApiUrl { reason, .. })) => reason,
            other => panic!("expected rejection of {s}, got {:?}", other),
        }
    }

    #[test]
    fn accepts_https_and_loopback_http() {
        assert_eq!(
            ApiUrl::new("https://crm.example.com/api/v1").unwrap().host(),
            Some("crm.example.com")
        );
        for local in [ApiUrl::DEFAULT, "http://127.0.0.1:8000", "http://[::1]:8000/api"] {
            assert!(ApiUrl::new(local).is_ok(), "{local} should be accepted");
        }
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let api = ApiUrl::new("https://crm.example.com/api/v1/").unwrap();
        assert_eq!(api.endpoint("users"), "https://crm.example.com/api/v1/users");
        assert_eq!(
            api.endpoint("/users/7"),
            "https://crm.example.com/api/v1/users/7"
        );
        assert_eq!(api.to_string(), "https://crm.example.com/api/v1/");
    }

    #[test]
    fn rejects_plain_http_to_remote_hosts() {
        assert!(reason("http://crm.example.com").contains("HTTPS"));
        assert!(reason("http://127.0.0.1.example.com").contains("HTTPS"));
    }

    #[test]
    fn rejects_query_and_fragment() {
        // Both would end up in front of every endpoint path.
        assert!(reason("https://crm.example.com/api?v=1").contains("query"));
        assert!(reason("https://crm.example.com/api#top").contains("fragment"));
    }

    #[test]
    fn rejects_embedded_credentials() {
        assert!(reason("https://ada:pw@crm.example.com/api").contains("credentials"));
    }

    #[test]
    fn rejects_relative_and_hostless_urls() {
        assert!(ApiUrl::new("/api/v1").is_err());
        assert!(reason("mailto:ops@example.com").contains("host"));
    }
}
