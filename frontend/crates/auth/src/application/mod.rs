//! Application Layer
//!
//! Session lifecycle services and navigation decisions.

pub mod auth_gateway;
pub mod config;
pub mod dashboard;
pub mod role_resolver;
pub mod route_guard;
pub mod session_store;

// Re-exports
pub use auth_gateway::{AuthGateway, PendingConfirmation, RegistrationInput};
pub use config::AuthConfig;
pub use dashboard::{Dispatch, dispatch, redirect_after_login};
pub use role_resolver::{RoleResolver, RoleSource};
pub use route_guard::{GuardOutcome, GuardState, RouteGuard};
pub use session_store::SessionStore;
