//! Auth Error Types
//!
//! The closed error set surfaced by the session layer. Identity-provider
//! codes, storage failures and token decoding problems are all translated
//! into one of these variants at the boundary where they occur.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::StorageError;
use thiserror::Error;

use crate::domain::claims::ClaimsError;
use crate::domain::port::ProviderError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants, one per [`ErrorKind`]
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email/password, or unknown account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account exists but its email was never confirmed
    #[error("User is not confirmed")]
    UserNotConfirmed,

    /// Confirmation code malformed or not matching
    #[error("Invalid confirmation code")]
    InvalidCode,

    /// Confirmation code no longer valid
    #[error("Confirmation code expired")]
    CodeExpired,

    /// No valid session could be established
    #[error("No active session")]
    NoSession,

    /// The identity provider could not be reached
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Local precondition failure on user-supplied data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::UserNotConfirmed => ErrorKind::UserNotConfirmed,
            AuthError::InvalidCode => ErrorKind::InvalidCode,
            AuthError::CodeExpired => ErrorKind::CodeExpired,
            AuthError::NoSession => ErrorKind::NoSession,
            AuthError::NetworkUnavailable(_) => ErrorKind::NetworkUnavailable,
            AuthError::InvalidInput(_) => ErrorKind::InvalidInput,
            AuthError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Narrow the error to the kinds an operation is documented to return
    ///
    /// Anything outside `allowed` becomes [`AuthError::Unknown`].
    pub fn restrict(self, allowed: &[ErrorKind]) -> Self {
        if allowed.contains(&self.kind()) {
            self
        } else {
            AuthError::Unknown(self.to_string())
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Unknown(msg) => {
                tracing::error!(message = %msg, "Auth unexpected error");
            }
            AuthError::NetworkUnavailable(msg) => {
                tracing::warn!(message = %msg, "Identity provider unreachable");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// Map an identity-provider error code to the closed taxonomy
pub fn kind_for_provider_code(code: &str) -> ErrorKind {
    match code {
        "NotAuthorizedException" | "UserNotFoundException" => ErrorKind::InvalidCredentials,
        "UserNotConfirmedException" => ErrorKind::UserNotConfirmed,
        "CodeMismatchException" => ErrorKind::InvalidCode,
        "ExpiredCodeException" => ErrorKind::CodeExpired,
        "InvalidParameterException" | "InvalidPasswordException" | "UsernameExistsException" => {
            ErrorKind::InvalidInput
        }
        _ => ErrorKind::Unknown,
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Service { code, message } => match kind_for_provider_code(&code) {
                ErrorKind::InvalidCredentials => AuthError::InvalidCredentials,
                ErrorKind::UserNotConfirmed => AuthError::UserNotConfirmed,
                ErrorKind::InvalidCode => AuthError::InvalidCode,
                ErrorKind::CodeExpired => AuthError::CodeExpired,
                ErrorKind::InvalidInput => AuthError::InvalidInput(message),
                _ => AuthError::Unknown(format!("{code}: {message}")),
            },
            ProviderError::Transport(msg) => AuthError::NetworkUnavailable(msg),
            ProviderError::Protocol(msg) => AuthError::Unknown(msg),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::InvalidCredentials => AuthError::InvalidCredentials,
            ErrorKind::UserNotConfirmed => AuthError::UserNotConfirmed,
            ErrorKind::InvalidCode => AuthError::InvalidCode,
            ErrorKind::CodeExpired => AuthError::CodeExpired,
            ErrorKind::NoSession => AuthError::NoSession,
            ErrorKind::NetworkUnavailable => AuthError::NetworkUnavailable(message),
            ErrorKind::InvalidInput => AuthError::InvalidInput(message),
            ErrorKind::Unknown => AuthError::Unknown(message),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

impl From<ClaimsError> for AuthError {
    fn from(err: ClaimsError) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(code: &str) -> ProviderError {
        ProviderError::Service {
            code: code.to_string(),
            message: "provider message".to_string(),
        }
    }

    #[test]
    fn test_provider_codes_map_to_closed_kinds() {
        let cases = [
            ("NotAuthorizedException", ErrorKind::InvalidCredentials),
            ("UserNotFoundException", ErrorKind::InvalidCredentials),
            ("UserNotConfirmedException", ErrorKind::UserNotConfirmed),
            ("CodeMismatchException", ErrorKind::InvalidCode),
            ("ExpiredCodeException", ErrorKind::CodeExpired),
            ("UsernameExistsException", ErrorKind::InvalidInput),
            ("InvalidPasswordException", ErrorKind::InvalidInput),
            ("TooManyRequestsException", ErrorKind::Unknown),
            ("", ErrorKind::Unknown),
        ];
        for (code, kind) in cases {
            assert_eq!(AuthError::from(service(code)).kind(), kind, "code {code}");
        }
    }

    #[test]
    fn test_transport_is_network_unavailable() {
        let err = AuthError::from(ProviderError::Transport("dns".to_string()));
        assert_eq!(err.kind(), ErrorKind::NetworkUnavailable);
    }

    #[test]
    fn test_restrict() {
        let allowed = [ErrorKind::InvalidCode, ErrorKind::CodeExpired];
        assert_eq!(AuthError::InvalidCode.restrict(&allowed).kind(), ErrorKind::InvalidCode);
        assert_eq!(
            AuthError::InvalidCredentials.restrict(&allowed).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_app_error_roundtrip_kind() {
        for kind in ErrorKind::ALL {
            let err = AuthError::from(AppError::new(kind, "x"));
            assert_eq!(err.kind(), kind);
            assert_eq!(err.to_app_error().kind(), kind);
        }
    }
}
