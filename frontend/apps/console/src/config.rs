//! Console Configuration
//!
//! Read from the environment (after `.env` is loaded).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use auth::application::config::PhoneNormalization;
use auth::presentation::Locale;
use auth::{AuthConfig, CognitoConfig};
use shipping::ApiConfig;

const DEFAULT_STORAGE_DIR: &str = ".courier";
const DEFAULT_ORIGIN: &str = "http://localhost:4200";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub auth: AuthConfig,
    pub cognito: CognitoConfig,
    pub api: ApiConfig,
    pub storage_dir: PathBuf,
    pub origin: String,
    pub locale: Locale,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = var("COGNITO_CLIENT_ID").context("COGNITO_CLIENT_ID must be set")?;

        let cognito = CognitoConfig {
            region: var("COGNITO_REGION").unwrap_or_else(|| CognitoConfig::default().region),
            client_id,
            endpoint: var("COGNITO_ENDPOINT"),
            timeout: Duration::from_secs(15),
        };

        let api = ApiConfig {
            base_url: var("API_BASE_URL").unwrap_or_else(|| ApiConfig::default().base_url),
            ..ApiConfig::default()
        };

        let mut auth = if cfg!(debug_assertions) {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };
        if let Some(mode) = var("PHONE_NORMALIZATION") {
            auth.phone_normalization = mode
                .parse::<PhoneNormalization>()
                .map_err(|e| anyhow::anyhow!("PHONE_NORMALIZATION: {e}"))?;
        }

        let locale = match var("APP_LOCALE") {
            Some(raw) => raw
                .parse::<Locale>()
                .map_err(|e| anyhow::anyhow!("APP_LOCALE: {e}"))?,
            None => Locale::default(),
        };

        Ok(Self {
            auth,
            cognito,
            api,
            storage_dir: var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
            origin: var("APP_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            locale,
        })
    }
}
