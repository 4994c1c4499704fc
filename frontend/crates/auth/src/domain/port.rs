//! Ports
//!
//! Interfaces to the collaborators the auth core drives but does not own:
//! the managed identity provider and the in-app router.
//! Implementations live in the infrastructure layer (or in tests).

use platform::password::ClearTextPassword;
use thiserror::Error;

/// Failure reported by an identity provider adapter
///
/// Provider-specific codes stay inside this type; the gateway converts it
/// into [`crate::error::AuthError`] before returning to callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with an error code
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The provider could not be reached (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with something we could not interpret
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ProviderError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened before the provider could answer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Tokens issued by a successful authentication or refresh
#[derive(Clone)]
pub struct ProviderTokens {
    pub access_token: String,
    pub id_token: String,
    /// Absent on refresh responses that do not rotate the refresh token
    pub refresh_token: Option<String>,
    pub expires_in_secs: i64,
}

impl std::fmt::Debug for ProviderTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderTokens")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// A user-pool attribute (`email`, `custom:role`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

impl UserAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Sign-up request sent to the provider
pub struct SignUpRequest {
    pub username: String,
    pub password: ClearTextPassword,
    pub attributes: Vec<UserAttribute>,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("username", &self.username)
            .field("password", &self.password)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Provider answer to a sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user_sub: String,
    pub confirmed: bool,
    /// Masked destination the confirmation code was sent to
    pub delivery_destination: Option<String>,
}

/// Identity provider capability interface
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Register a new user; the account stays unconfirmed until the code is checked
    async fn sign_up(&self, request: &SignUpRequest) -> ProviderResult<SignUpOutcome>;

    /// Confirm a registration with the emailed code
    async fn confirm_sign_up(&self, username: &str, code: &str) -> ProviderResult<()>;

    /// Send a new confirmation code
    async fn resend_confirmation_code(&self, username: &str) -> ProviderResult<()>;

    /// Username/password authentication
    async fn initiate_auth(&self, username: &str, password: &str) -> ProviderResult<ProviderTokens>;

    /// Exchange a refresh token for fresh tokens
    async fn refresh_tokens(&self, refresh_token: &str) -> ProviderResult<ProviderTokens>;

    /// Invalidate every token issued to the user
    async fn global_sign_out(&self, access_token: &str) -> ProviderResult<()>;
}

/// In-app router the guard and dispatcher issue redirects through
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }
}
