//! Registration Profile Entity

use crate::domain::port::UserAttribute;
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber, user_role::Role};

/// Validated profile of a self-registering user
///
/// Self-registration always creates a CLIENT; staff roles are assigned
/// out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProfile {
    pub email: Email,
    pub given_name: String,
    pub family_name: String,
    pub phone: PhoneNumber,
    pub address: String,
    pub document_id: String,
}

impl RegistrationProfile {
    /// User-pool attributes sent with the sign-up
    pub fn to_attributes(&self) -> Vec<UserAttribute> {
        vec![
            UserAttribute::new("email", self.email.as_str()),
            UserAttribute::new("given_name", &self.given_name),
            UserAttribute::new("family_name", &self.family_name),
            UserAttribute::new("phone_number", self.phone.as_str()),
            UserAttribute::new("address", &self.address),
            UserAttribute::new("custom:document", &self.document_id),
            UserAttribute::new("custom:role", Role::Client.code()),
        ]
    }
}
