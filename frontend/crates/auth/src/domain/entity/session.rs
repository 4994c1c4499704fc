//! Session Entity
//!
//! The authenticated state derived from a successful login or refresh.
//! Persisted as JSON by the session store; owned exclusively by it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::claims::{ClaimsError, IdTokenClaims};
use crate::domain::port::ProviderTokens;
use crate::domain::value_object::{subject_id::SubjectId, user_role::Role};

/// Provider-issued tokens
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Session entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: SubjectId,
    pub role: Role,
    pub tokens: SessionTokens,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from freshly issued tokens
    ///
    /// Subject and role come from the id token. Expiry is the token's `exp`
    /// when present, else `now + expires_in`. `fallback_refresh` is used when
    /// the provider did not return a refresh token (refresh responses).
    pub fn from_tokens(
        tokens: ProviderTokens,
        fallback_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ClaimsError> {
        let claims = IdTokenClaims::decode(&tokens.id_token)?;
        let subject_id = SubjectId::new(claims.sub.clone()).map_err(|_| ClaimsError::MissingSubject)?;

        let expires_at = claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .unwrap_or_else(|| now + Duration::seconds(tokens.expires_in_secs.max(0)));

        Ok(Self {
            subject_id,
            role: claims.role(),
            tokens: SessionTokens {
                access_token: tokens.access_token,
                id_token: tokens.id_token,
                refresh_token: tokens.refresh_token.or(fallback_refresh),
            },
            expires_at,
        })
    }

    /// Expired, or within `skew` of expiring
    pub fn is_expired(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew >= self.expires_at
    }

    /// Structural checks applied to persisted sessions
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.subject_id.as_str().is_empty() {
            return Err("empty subject");
        }
        if self.tokens.access_token.is_empty() || self.tokens.id_token.is_empty() {
            return Err("empty token");
        }
        if matches!(self.tokens.refresh_token.as_deref(), Some("")) {
            return Err("empty refresh token");
        }
        Ok(())
    }

    /// Value for the `Authorization` header of backend calls
    pub fn bearer(&self) -> &str {
        &self.tokens.id_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.refresh_token.as_deref()
    }
}
