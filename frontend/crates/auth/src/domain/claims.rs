//! Id Token Claims
//!
//! Reads the payload segment of the provider's id token. Signature checking
//! is the backend's job; the front-end only needs `sub`, `exp` and the role.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::value_object::user_role::Role;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Token is not a three-part JWT")]
    Shape,

    #[error("Token payload is not base64url: {0}")]
    Encoding(String),

    #[error("Token has an empty subject")]
    MissingSubject,

    #[error("Token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Claims the front-end relies on
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "custom:role", default)]
    pub custom_role: Option<String>,
    #[serde(rename = "cognito:groups", default)]
    pub groups: Vec<String>,
}

impl IdTokenClaims {
    /// Decode the payload of a compact JWT
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimsError::Shape);
        };

        let bytes = platform::crypto::from_base64_url(payload)
            .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Role carried by the token
    ///
    /// `custom:role` wins; otherwise the first group naming a known role.
    /// Anything else is [`Role::Unknown`].
    pub fn role(&self) -> Role {
        if let Some(raw) = self.custom_role.as_deref() {
            return Role::from_claim(raw);
        }

        self.groups
            .iter()
            .map(|g| Role::from_claim(g))
            .find(Role::is_known)
            .unwrap_or(Role::Unknown)
    }
}
