//! Domain Entities

pub mod registration;
pub mod route_policy;
pub mod session;
