//! Domain Layer
//!
//! Contains entities, value objects, token claims, and the ports to
//! external collaborators (identity provider, router).

pub mod claims;
pub mod entity;
pub mod port;
pub mod value_object;

// Re-exports
pub use entity::{registration::RegistrationProfile, route_policy::RouteAccessPolicy, session::Session};
pub use port::{IdentityProvider, Navigator, ProviderError, ProviderTokens};
