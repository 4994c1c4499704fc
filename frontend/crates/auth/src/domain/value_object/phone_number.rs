//! Phone Number Value Object
//!
//! Registration phones are sent to the identity provider in an E.164-like
//! form: `+`, country code, subscriber digits.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shortest and longest accepted digit count (country code included)
const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

/// How raw phone input is turned into the provider form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneNormalization {
    /// Keep digits and `+`, then always prepend the country prefix.
    ///
    /// Not idempotent: `+573001234567` becomes `+57+573001234567`.
    #[default]
    Legacy,

    /// Numbers that already carry `+` pass through; others get the prefix.
    Canonical,
}

impl FromStr for PhoneNormalization {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "canonical" => Ok(Self::Canonical),
            other => Err(AppError::invalid_input(format!(
                "Unknown phone normalization mode: {other}"
            ))),
        }
    }
}

/// Normalized phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize user input with the given country prefix (e.g. `+57`)
    pub fn normalize(raw: &str, prefix: &str, mode: PhoneNormalization) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::invalid_input("Phone number cannot be empty"));
        }

        let normalized = match mode {
            PhoneNormalization::Legacy => {
                let kept: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect();
                format!("{prefix}{kept}")
            }
            PhoneNormalization::Canonical => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if raw.starts_with('+') {
                    format!("+{digits}")
                } else {
                    format!("{prefix}{digits}")
                }
            }
        };

        // Legacy output may carry the prefix twice.
        let max_digits = match mode {
            PhoneNormalization::Legacy => MAX_DIGITS * 2,
            PhoneNormalization::Canonical => MAX_DIGITS,
        };
        let digit_count = normalized.chars().filter(|c| c.is_ascii_digit()).count();
        if !(MIN_DIGITS..=max_digits).contains(&digit_count) {
            return Err(AppError::invalid_input(format!(
                "Phone number must have between {MIN_DIGITS} and {max_digits} digits"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
