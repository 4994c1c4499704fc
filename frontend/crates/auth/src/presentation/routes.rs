//! Route Table and In-App Router
//!
//! Protected routes declare their [`RouteAccessPolicy`] here, once. The
//! router runs the guard for them and records where the user landed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use kernel::id::NavigationId;

use crate::application::dashboard::{
    ADMIN_DASHBOARD, CLIENT_DASHBOARD, DELIVERY_DASHBOARD, SECRETARY_DASHBOARD,
};
use crate::application::role_resolver::RoleSource;
use crate::application::route_guard::RouteGuard;
use crate::domain::entity::route_policy::RouteAccessPolicy;
use crate::domain::port::Navigator;
use crate::domain::value_object::user_role::Role;

/// A navigable route
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: &'static str,
    /// `None` for public routes
    pub policy: Option<RouteAccessPolicy>,
}

impl RouteEntry {
    fn public(path: &'static str) -> Self {
        Self { path, policy: None }
    }

    fn protected(path: &'static str, policy: RouteAccessPolicy) -> Self {
        Self {
            path,
            policy: Some(policy),
        }
    }
}

pub fn route_table() -> Vec<RouteEntry> {
    use Role::*;
    vec![
        RouteEntry::public("login"),
        RouteEntry::public("register"),
        RouteEntry::public("confirm"),
        RouteEntry::public("tracking"),
        RouteEntry::protected(CLIENT_DASHBOARD, RouteAccessPolicy::only([Client])),
        RouteEntry::protected(DELIVERY_DASHBOARD, RouteAccessPolicy::only([Delivery])),
        RouteEntry::protected(SECRETARY_DASHBOARD, RouteAccessPolicy::only([Secretary])),
        RouteEntry::protected(ADMIN_DASHBOARD, RouteAccessPolicy::only([Admin])),
        RouteEntry::protected("guides/new", RouteAccessPolicy::only([Secretary, Admin])),
        RouteEntry::protected("pricing", RouteAccessPolicy::only([Client, Secretary, Admin])),
        RouteEntry::protected("ratings", RouteAccessPolicy::only([Client])),
        RouteEntry::protected("profile", RouteAccessPolicy::any_authenticated()),
    ]
}

/// Current location plus the most recent visits
#[derive(Debug)]
pub struct Location {
    visited: Mutex<VecDeque<String>>,
    limit: usize,
}

impl Location {
    /// Keep at most `limit` visits (at least one)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            visited: Mutex::new(VecDeque::with_capacity(limit)),
            limit,
        }
    }

    pub fn current(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Oldest first
    pub fn history(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl Navigator for Location {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigate");
        let mut visited = self.visited.lock().unwrap_or_else(PoisonError::into_inner);
        if visited.len() == self.limit {
            visited.pop_front();
        }
        visited.push_back(path.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    Entered(String),
    /// The guard refused `from` and sent the user to `to`
    Redirected { from: String, to: String },
    NotFound(String),
}

/// In-app router
pub struct AppRouter<R>
where
    R: RoleSource,
{
    routes: Vec<RouteEntry>,
    guard: RouteGuard<R, Location>,
    location: Arc<Location>,
}

impl<R> AppRouter<R>
where
    R: RoleSource + Sync,
{
    pub fn new(resolver: Arc<R>, login_path: &str, guard_history: usize) -> Self {
        let location = Arc::new(Location::new(guard_history));
        Self {
            routes: route_table(),
            guard: RouteGuard::new(resolver, location.clone(), login_path, guard_history),
            location,
        }
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    pub fn route(&self, path: &str) -> Option<&RouteEntry> {
        let path = path.trim().trim_matches('/');
        self.routes.iter().find(|r| r.path == path)
    }

    /// Navigate to `path`, running the guard for protected routes
    pub async fn navigate(&self, path: &str) -> NavigationResult {
        let Some(entry) = self.route(path) else {
            return NavigationResult::NotFound(path.to_string());
        };

        let Some(policy) = &entry.policy else {
            self.location.navigate(entry.path);
            return NavigationResult::Entered(entry.path.to_string());
        };

        let navigation = NavigationId::new();
        let allowed = self.guard.can_activate(navigation, policy).await;
        self.guard.finish(navigation);

        if allowed {
            self.location.navigate(entry.path);
            NavigationResult::Entered(entry.path.to_string())
        } else {
            NavigationResult::Redirected {
                from: entry.path.to_string(),
                to: self.location.current().unwrap_or_default(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, AuthResult};

    struct Fixed(Option<Role>);

    impl RoleSource for Fixed {
        async fn get_user_role(&self) -> AuthResult<Role> {
            self.0.ok_or(AuthError::NoSession)
        }
    }

    fn router(role: Option<Role>) -> AppRouter<Fixed> {
        AppRouter::new(Arc::new(Fixed(role)), "login", 64)
    }

    #[test]
    fn test_route_table_policies() {
        let router = router(None);
        assert!(router.route("/tracking").unwrap().policy.is_none());

        let guides = router.route("guides/new").unwrap().policy.as_ref().unwrap();
        assert!(guides.permits(Role::Secretary));
        assert!(guides.permits(Role::Admin));
        assert!(!guides.permits(Role::Client));

        let profile = router.route("profile").unwrap().policy.as_ref().unwrap();
        assert!(Role::KNOWN.iter().all(|r| profile.permits(*r)));
    }

    #[tokio::test]
    async fn test_public_route_needs_no_session() {
        let router = router(None);
        assert_eq!(
            router.navigate("tracking").await,
            NavigationResult::Entered("tracking".into())
        );
    }

    #[tokio::test]
    async fn test_protected_route_redirects() {
        let router = router(Some(Role::Delivery));
        assert_eq!(
            router.navigate("pricing").await,
            NavigationResult::Redirected {
                from: "pricing".into(),
                to: "delivery".into()
            }
        );
        assert_eq!(router.location().history(), vec!["delivery".to_string()]);

        let anonymous = self::router(None);
        assert_eq!(
            anonymous.navigate("profile").await,
            NavigationResult::Redirected {
                from: "profile".into(),
                to: "login".into()
            }
        );
    }

    #[tokio::test]
    async fn test_allowed_and_unknown_routes() {
        let router = router(Some(Role::Admin));
        assert_eq!(
            router.navigate("/guides/new").await,
            NavigationResult::Entered("guides/new".into())
        );
        assert_eq!(
            router.navigate("nowhere").await,
            NavigationResult::NotFound("nowhere".into())
        );
    }

    #[test]
    fn test_location_keeps_most_recent_visits() {
        let location = Location::new(2);
        for path in ["login", "client", "pricing"] {
            location.navigate(path);
        }
        assert_eq!(location.history(), vec!["client".to_string(), "pricing".to_string()]);
        assert_eq!(location.current().as_deref(), Some("pricing"));
    }
}
