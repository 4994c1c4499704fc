//! Presentation Layer
//!
//! Route table, in-app router and user-facing error messages.

pub mod messages;
pub mod routes;

// Re-exports
pub use messages::{Locale, message_for, retry_hint};
pub use routes::{AppRouter, Location, NavigationResult, RouteEntry, route_table};
