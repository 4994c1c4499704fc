//! Auth Gateway
//!
//! Registration, confirmation, login, logout and session refresh against
//! the identity provider. Every operation is single-shot (no retries).
//! Provider failures leave this module as one of the closed [`ErrorKind`]s.

use std::sync::Arc;

use chrono::Utc;
use kernel::error::kind::ErrorKind;
use platform::password::ClearTextPassword;
use platform::storage::DurableStore;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::entity::{registration::RegistrationProfile, session::Session};
use crate::domain::port::{IdentityProvider, SignUpRequest};
use crate::domain::value_object::{
    confirmation_code::ConfirmationCode, email::Email, phone_number::PhoneNumber,
    user_role::Role,
};
use crate::error::{AuthError, AuthResult};

const REGISTER_ERRORS: &[ErrorKind] = &[ErrorKind::InvalidInput, ErrorKind::NetworkUnavailable];
const CONFIRM_ERRORS: &[ErrorKind] = &[
    ErrorKind::InvalidCode,
    ErrorKind::CodeExpired,
    ErrorKind::InvalidInput,
    ErrorKind::NetworkUnavailable,
];
const RESEND_ERRORS: &[ErrorKind] = &[ErrorKind::InvalidInput, ErrorKind::NetworkUnavailable];
const LOGIN_ERRORS: &[ErrorKind] = &[
    ErrorKind::InvalidCredentials,
    ErrorKind::UserNotConfirmed,
    ErrorKind::InvalidInput,
    ErrorKind::NetworkUnavailable,
];

/// Raw registration form
#[derive(Clone, Default)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub given_name: String,
    pub family_name: String,
    pub phone: String,
    pub address: String,
    pub document_id: String,
}

impl std::fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("given_name", &self.given_name)
            .field("family_name", &self.family_name)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Registration accepted; waiting for the emailed code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub email: Email,
    pub user_sub: String,
    /// Phone number exactly as sent to the provider
    pub phone: PhoneNumber,
    /// Masked address the code was delivered to
    pub delivery_destination: Option<String>,
    /// The provider auto-confirmed the account
    pub confirmed: bool,
}

/// Auth gateway service
pub struct AuthGateway<P, S>
where
    P: IdentityProvider,
    S: DurableStore,
{
    provider: Arc<P>,
    store: Arc<SessionStore<S>>,
    config: Arc<AuthConfig>,
}

impl<P, S> AuthGateway<P, S>
where
    P: IdentityProvider,
    S: DurableStore,
{
    pub fn new(provider: Arc<P>, store: Arc<SessionStore<S>>, config: Arc<AuthConfig>) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    pub fn session_store(&self) -> &Arc<SessionStore<S>> {
        &self.store
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new CLIENT account
    pub async fn register(&self, input: RegistrationInput) -> AuthResult<PendingConfirmation> {
        settle(self.register_inner(input).await, REGISTER_ERRORS)
    }

    async fn register_inner(&self, input: RegistrationInput) -> AuthResult<PendingConfirmation> {
        let required = [
            ("email", &input.email),
            ("password", &input.password),
            ("given_name", &input.given_name),
            ("family_name", &input.family_name),
            ("phone", &input.phone),
            ("address", &input.address),
            ("document_id", &input.document_id),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::InvalidInput(format!("{field} is required")));
        }

        let email = Email::new(input.email.as_str())?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;
        let phone = PhoneNumber::normalize(
            &input.phone,
            &self.config.country_prefix,
            self.config.phone_normalization,
        )?;

        let profile = RegistrationProfile {
            email: email.clone(),
            given_name: input.given_name.trim().to_string(),
            family_name: input.family_name.trim().to_string(),
            phone: phone.clone(),
            address: input.address.trim().to_string(),
            document_id: input.document_id.trim().to_string(),
        };

        let request = SignUpRequest {
            username: email.as_str().to_string(),
            password,
            attributes: profile.to_attributes(),
        };

        let outcome = self.provider.sign_up(&request).await?;

        tracing::info!(email = %email.masked(), "User signed up");

        Ok(PendingConfirmation {
            email,
            user_sub: outcome.user_sub,
            phone,
            delivery_destination: outcome.delivery_destination,
            confirmed: outcome.confirmed,
        })
    }

    /// Confirm a registration with the emailed code
    pub async fn confirm(&self, email: &str, code: &str) -> AuthResult<()> {
        settle(self.confirm_inner(email, code).await, CONFIRM_ERRORS)
    }

    async fn confirm_inner(&self, email: &str, code: &str) -> AuthResult<()> {
        let email = Email::new(email)?;
        let code = ConfirmationCode::parse(code, self.config.confirmation_code_length)?;

        self.provider
            .confirm_sign_up(email.as_str(), code.as_str())
            .await?;

        tracing::info!(email = %email.masked(), "User confirmed");
        Ok(())
    }

    /// Ask the provider to email a new confirmation code
    pub async fn resend_confirmation(&self, email: &str) -> AuthResult<()> {
        settle(self.resend_inner(email).await, RESEND_ERRORS)
    }

    async fn resend_inner(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;
        self.provider.resend_confirmation_code(email.as_str()).await?;

        tracing::info!(email = %email.masked(), "Confirmation code resent");
        Ok(())
    }

    /// Sign in and store the session
    ///
    /// The session is written before this returns, so a role lookup that
    /// follows sees it.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Role> {
        settle(self.login_inner(email, password).await, LOGIN_ERRORS)
    }

    async fn login_inner(&self, email: &str, password: &str) -> AuthResult<Role> {
        let email = Email::new(email)?;
        let password = ClearTextPassword::unvalidated(password.to_string())
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        let tokens = self
            .provider
            .initiate_auth(email.as_str(), password.expose())
            .await?;
        let session = Session::from_tokens(tokens, None, Utc::now())?;
        let role = session.role;

        self.store.set_session(session);

        tracing::info!(email = %email.masked(), role = %role, "User signed in");
        Ok(role)
    }

    /// Sign out
    ///
    /// Remote invalidation is best effort and bounded by
    /// `sign_out_timeout`; the local session is always cleared.
    pub async fn logout(&self) {
        if let Some(session) = self.store.get_session() {
            let remote = tokio::time::timeout(
                self.config.sign_out_timeout,
                self.provider.global_sign_out(&session.tokens.access_token),
            )
            .await;

            match remote {
                Ok(Ok(())) => tracing::debug!("Remote session invalidated"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Remote sign-out failed"),
                Err(_) => tracing::warn!(
                    timeout_ms = self.config.sign_out_timeout.as_millis() as u64,
                    "Remote sign-out timed out"
                ),
            }
        }

        self.store.clear_session();
        tracing::info!("User signed out");
    }

    /// Exchange the stored refresh token for a fresh session
    ///
    /// - no session or no refresh token: `NoSession`
    /// - provider unreachable: `NetworkUnavailable`, session kept
    /// - provider rejected the token: session cleared, `NoSession`
    pub async fn refresh_session(&self) -> AuthResult<Session> {
        let current = self.store.get_session().ok_or(AuthError::NoSession)?;
        let refresh_token = current
            .refresh_token()
            .map(str::to_string)
            .ok_or(AuthError::NoSession)?;

        let tokens = match self.provider.refresh_tokens(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) if e.is_transport() => {
                tracing::warn!(error = %e, "Session refresh unreachable");
                return Err(e.into());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session refresh rejected");
                self.store.clear_session();
                return Err(AuthError::NoSession);
            }
        };

        let session = match Session::from_tokens(tokens, Some(refresh_token), Utc::now()) {
            Ok(session) if session.subject_id == current.subject_id => session,
            Ok(session) => {
                tracing::warn!(
                    expected = %current.subject_id,
                    actual = %session.subject_id,
                    "Refreshed token belongs to another subject"
                );
                self.store.clear_session();
                return Err(AuthError::NoSession);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refreshed id token unreadable");
                self.store.clear_session();
                return Err(AuthError::NoSession);
            }
        };

        self.store.set_session(session.clone());
        tracing::debug!(subject = %session.subject_id, role = %session.role, "Session refreshed");
        Ok(session)
    }
}

/// Narrow to the operation's documented kinds and log failures
fn settle<T>(result: AuthResult<T>, allowed: &[ErrorKind]) -> AuthResult<T> {
    result.map_err(|e| {
        let e = e.restrict(allowed);
        e.log();
        e
    })
}
