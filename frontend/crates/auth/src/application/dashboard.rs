//! Dashboard Dispatcher
//!
//! Role to landing route. Exhaustive over [`Role`]: an unrecognized role
//! is denied, never given a default dashboard.

use crate::domain::port::Navigator;
use crate::domain::value_object::user_role::Role;

pub const CLIENT_DASHBOARD: &str = "client";
pub const DELIVERY_DASHBOARD: &str = "delivery";
pub const SECRETARY_DASHBOARD: &str = "secretary";
pub const ADMIN_DASHBOARD: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Dashboard(&'static str),
    Deny,
}

pub fn dispatch(role: Role) -> Dispatch {
    match role {
        Role::Client => Dispatch::Dashboard(CLIENT_DASHBOARD),
        Role::Delivery => Dispatch::Dashboard(DELIVERY_DASHBOARD),
        Role::Secretary => Dispatch::Dashboard(SECRETARY_DASHBOARD),
        Role::Admin => Dispatch::Dashboard(ADMIN_DASHBOARD),
        Role::Unknown => Dispatch::Deny,
    }
}

/// Post-login redirect: exactly one navigation, dashboard or login
pub fn redirect_after_login<N>(role: Role, navigator: &N, login_path: &str) -> Dispatch
where
    N: Navigator + ?Sized,
{
    let decision = dispatch(role);
    match decision {
        Dispatch::Dashboard(path) => navigator.navigate(path),
        Dispatch::Deny => {
            tracing::warn!(role = %role, "No dashboard for role, sending to login");
            navigator.navigate(login_path);
        }
    }
    decision
}
