//! Clear-Text Password Handling
//!
//! Passwords only exist for the duration of a sign-up or sign-in call and
//! are handed to the identity provider as-is. This module validates them
//! against the user-pool policy before any network call and erases them
//! from memory when dropped.
//!
//! ## Policy (identity-provider defaults)
//! - At least 8 characters, at most 256
//! - At least one uppercase letter, one lowercase letter, one digit
//! - At least one symbol

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is empty or only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// A required character class is missing
    #[error("Password must contain at least one {0}")]
    MissingClass(CharClass),
}

/// Character classes required by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CharClass::Uppercase => "uppercase letter",
            CharClass::Lowercase => "lowercase letter",
            CharClass::Digit => "digit",
            CharClass::Symbol => "symbol",
        })
    }
}

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for registration, enforcing the full policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unvalidated(raw)?;
        let value = password.expose();

        let char_count = value.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if !value.chars().any(|c| c.is_uppercase()) {
            return Err(PasswordPolicyError::MissingClass(CharClass::Uppercase));
        }
        if !value.chars().any(|c| c.is_lowercase()) {
            return Err(PasswordPolicyError::MissingClass(CharClass::Lowercase));
        }
        if !value.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingClass(CharClass::Digit));
        }
        if !value
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            return Err(PasswordPolicyError::MissingClass(CharClass::Symbol));
        }

        Ok(password)
    }

    /// Create a password for sign-in, only rejecting empty input
    ///
    /// Policy is enforced by the identity provider for existing accounts.
    pub fn unvalidated(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.trim().is_empty() {
            let mut raw = raw;
            raw.zeroize();
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the clear text for handing to the identity provider
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        let password = ClearTextPassword::new("Secret1!".to_string()).unwrap();
        assert_eq!(password.expose(), "Secret1!");
    }

    #[test]
    fn test_policy_violations() {
        assert_eq!(
            ClearTextPassword::new("   ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("Se1!".to_string()).unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 4 }
        );
        assert_eq!(
            ClearTextPassword::new("secret12!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingClass(CharClass::Uppercase)
        );
        assert_eq!(
            ClearTextPassword::new("SECRET12!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingClass(CharClass::Lowercase)
        );
        assert_eq!(
            ClearTextPassword::new("Secretly!".to_string()).unwrap_err(),
            PasswordPolicyError::MissingClass(CharClass::Digit)
        );
        assert_eq!(
            ClearTextPassword::new("Secret123".to_string()).unwrap_err(),
            PasswordPolicyError::MissingClass(CharClass::Symbol)
        );
    }

    #[test]
    fn test_too_long() {
        let raw = format!("Aa1!{}", "x".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(
            ClearTextPassword::new(raw),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_unvalidated_only_rejects_empty() {
        assert!(ClearTextPassword::unvalidated("short".to_string()).is_ok());
        assert!(ClearTextPassword::unvalidated(" \t".to_string()).is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = ClearTextPassword::new("Secret1!".to_string()).unwrap();
        let debug = format!("{:?}", password);
        assert!(!debug.contains("Secret1!"));
        assert!(debug.contains("REDACTED"));
    }
}
