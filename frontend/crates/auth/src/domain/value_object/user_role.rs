use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of permission classes
///
/// `Unknown` stands for a role claim this front-end does not recognize.
/// It is a member of the set so a session can carry it, but it is never
/// granted access to a protected route or mapped to a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Client,
    Delivery,
    Secretary,
    Admin,
    Unknown,
}

impl Role {
    /// Every recognized role, in dashboard order
    pub const KNOWN: [Role; 4] = [Role::Client, Role::Delivery, Role::Secretary, Role::Admin];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Client => "CLIENT",
            Delivery => "DELIVERY",
            Secretary => "SECRETARY",
            Admin => "ADMIN",
            Unknown => "UNKNOWN",
        }
    }

    #[inline]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown)
    }

    /// Parse a role claim issued by the identity provider
    ///
    /// Case-insensitive; anything unrecognized becomes [`Role::Unknown`].
    pub fn from_claim(claim: &str) -> Self {
        use Role::*;
        match claim.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Client,
            "DELIVERY" => Delivery,
            "SECRETARY" => Secretary,
            "ADMIN" => Admin,
            other => {
                tracing::warn!(claim = %other, "Unrecognized role claim");
                Unknown
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
