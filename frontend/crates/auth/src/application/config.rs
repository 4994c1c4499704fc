//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

pub use crate::domain::value_object::phone_number::PhoneNormalization;
use crate::domain::value_object::confirmation_code::DEFAULT_CODE_LENGTH;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Country prefix prepended to local phone numbers
    pub country_prefix: String,
    /// Phone normalization mode used at registration
    pub phone_normalization: PhoneNormalization,
    /// Digits in an emailed confirmation code
    pub confirmation_code_length: usize,
    /// A session this close to expiry is treated as expired
    pub expiry_skew: Duration,
    /// Namespace for durable storage keys
    pub storage_namespace: String,
    /// Route unauthenticated users are sent to
    pub login_path: String,
    /// Upper bound on the remote sign-out call during logout
    pub sign_out_timeout: Duration,
    /// Guard decisions remembered for repeated invocations
    pub guard_history: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            country_prefix: "+57".to_string(),
            phone_normalization: PhoneNormalization::Legacy,
            confirmation_code_length: DEFAULT_CODE_LENGTH,
            expiry_skew: Duration::from_secs(60),
            storage_namespace: "courier".to_string(),
            login_path: "login".to_string(),
            sign_out_timeout: Duration::from_secs(5),
            guard_history: 64,
        }
    }
}

impl AuthConfig {
    /// Create config for development (idempotent phone normalization)
    pub fn development() -> Self {
        Self {
            phone_normalization: PhoneNormalization::Canonical,
            ..Default::default()
        }
    }

    /// Storage key of the persisted session
    pub fn session_key(&self) -> String {
        format!("{}.session", self.storage_namespace)
    }

    /// Expiry skew as a chrono duration
    pub fn expiry_skew_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.expiry_skew).unwrap_or(chrono::Duration::zero())
    }
}
