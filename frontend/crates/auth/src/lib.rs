//! Auth (Session & Access) Front-End Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, ports to external collaborators
//! - `application/` - Session store, auth gateway, role resolver, route guard,
//!   dashboard dispatch
//! - `infra/` - Identity-provider adapter (user-pool JSON API)
//! - `presentation/` - Route table, in-app router, user-facing messages
//!
//! ## Flow
//! 1. Credentials go through the [`AuthGateway`] to the identity provider
//! 2. The resulting tokens are written to the [`SessionStore`]
//! 3. The role carried by the id token picks the landing dashboard
//! 4. Every protected navigation re-resolves the role through the
//!    [`RouteGuard`], which either lets it through or redirects
//!
//! ## Security Model
//! - A session is either absent or carries a role of the closed [`Role`] set
//! - An unrecognized role never reaches a dashboard: it is sent to login
//! - Malformed persisted state reads as "signed out", never as a role
//! - Provider error codes are translated at the gateway boundary

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::auth_gateway::{AuthGateway, PendingConfirmation, RegistrationInput};
pub use application::config::AuthConfig;
pub use application::dashboard::{Dispatch, dispatch, redirect_after_login};
pub use application::role_resolver::{RoleResolver, RoleSource};
pub use application::route_guard::{GuardOutcome, GuardState, RouteGuard};
pub use application::session_store::SessionStore;
pub use domain::entity::{route_policy::RouteAccessPolicy, session::Session};
pub use domain::value_object::user_role::Role;
pub use error::{AuthError, AuthResult};
pub use infra::cognito::{CognitoConfig, CognitoIdentityProvider};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
