//! Value Object Module

pub mod confirmation_code;
pub mod email;
pub mod phone_number;
pub mod subject_id;
pub mod user_role;
