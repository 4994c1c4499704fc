//! Infrastructure Layer
//!
//! Identity-provider adapter implementing the domain port.

pub mod cognito;
