//! Email Value Object
//!
//! The sign-in username. Only the shape is checked here; ownership is
//! proven by the emailed confirmation code.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RFC 5321 limits
const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and check the address shape
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let email = raw.into().trim().to_lowercase();

        if let Some(problem) = shape_problem(&email) {
            return Err(AppError::invalid_input(format!("Invalid email: {problem}"))
                .with_action("Enter an address like name@example.com"));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or_default()
    }

    /// `a***@example.com`, for log lines
    pub fn masked(&self) -> String {
        match self.0.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().unwrap_or('*');
                format!("{first}***@{domain}")
            }
            None => "***".to_string(),
        }
    }
}

fn shape_problem(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("empty");
    }
    if email.len() > MAX_LEN {
        return Some("too long");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Some("missing @");
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN || local.chars().any(char::is_whitespace) {
        return Some("bad local part");
    }

    let labels_ok = domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !labels_ok {
        return Some("bad domain");
    }
    None
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
