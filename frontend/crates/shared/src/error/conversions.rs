//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::TimedOut => ErrorKind::NetworkUnavailable,
            _ => ErrorKind::Unknown,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::unknown("Invalid UTF-8 string").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::unknown(format!("JSON error: {}", err)).with_source(err)
    }
}

// ============================================================================
// reqwest conversions (feature-gated)
// ============================================================================

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return AppError::network_unavailable("Backend unreachable").with_source(err);
        }

        let app_err = match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => AppError::no_session("Backend rejected the id token"),
            Some(400) | Some(422) => AppError::invalid_input("Backend rejected the request"),
            Some(code) => AppError::unknown(format!("Backend returned HTTP {code}")),
            None if err.is_decode() => AppError::unknown("Malformed backend response"),
            None => AppError::unknown("HTTP request failed"),
        };
        app_err.with_source(err)
    }
}

/// HTTP ステータスコードからエラー種別を判定
///
/// バックエンド API の応答を閉じた分類に写像します。
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::NoSession,
        400 | 422 => ErrorKind::InvalidInput,
        _ => ErrorKind::Unknown,
    }
}
