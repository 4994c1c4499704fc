//! Confirmation Code Value Object
//!
//! The numeric code the identity provider emails after registration.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Default code length issued by the identity provider
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Validated confirmation code (exactly N ASCII decimal digits)
#[derive(Clone, PartialEq, Eq)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Validate a user-entered code
    ///
    /// Surrounding whitespace is ignored; anything else that is not a
    /// decimal digit, or a wrong length, is rejected before submission.
    pub fn parse(raw: &str, length: usize) -> AppResult<Self> {
        let code = raw.trim();

        if code.len() != length || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::invalid_code(format!(
                "Confirmation code must be exactly {length} digits"
            )));
        }

        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfirmationCode").field(&"******").finish()
    }
}
