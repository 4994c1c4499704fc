//! HTTP Client Utilities
//!
//! Client construction and `Authorization: Bearer` plumbing shared by the
//! identity-provider adapter and the backend API wrappers.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of the id token attached to protected backend calls
///
/// Implemented by the session store. `None` means "not signed in", a local
/// precondition failure rather than a network error.
pub trait IdTokenSource: Send + Sync {
    fn id_token(&self) -> Option<String>;
}

/// Build an HTTP client with the given timeout
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("courier-frontend/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Format a bearer credential
pub fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// Headers carrying `Authorization: Bearer <token>`
pub fn bearer_headers(token: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&bearer_value(token))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_value() {
        assert_eq!(bearer_value("abc.def.ghi"), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_bearer_headers_sensitive() {
        let headers = bearer_headers("abc.def.ghi").unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc.def.ghi");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_headers_rejects_newline() {
        assert!(bearer_headers("abc\ndef").is_err());
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(DEFAULT_TIMEOUT).is_ok());
    }
}
