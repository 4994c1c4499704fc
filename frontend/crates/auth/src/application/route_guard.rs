//! Route Guard
//!
//! Pre-activation hook for protected routes. Each navigation attempt goes
//! `evaluating -> {allowed, redirect-dashboard, redirect-login}` exactly once:
//! concurrent or repeated invocations for the same [`NavigationId`] await the
//! same evaluation and observe the same outcome, so at most one redirect is
//! issued per navigation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use kernel::id::NavigationId;
use tokio::sync::OnceCell;

use crate::application::dashboard::{Dispatch, dispatch};
use crate::application::role_resolver::RoleSource;
use crate::domain::entity::route_policy::RouteAccessPolicy;
use crate::domain::port::Navigator;
use crate::domain::value_object::user_role::Role;

/// Terminal guard decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed,
    /// Role resolved but not permitted; sent to its own dashboard
    RedirectDashboard(&'static str),
    /// No session, resolution failure, or unrecognized role
    RedirectLogin,
}

impl GuardOutcome {
    /// Router verdict: `true` proceeds, `false` cancels
    pub fn proceed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Evaluating,
    Decided(GuardOutcome),
}

/// Pure decision for a resolved role (`None` = unauthenticated)
pub fn decide(role: Option<Role>, policy: &RouteAccessPolicy) -> GuardOutcome {
    match role {
        Some(role) if policy.permits(role) => GuardOutcome::Allowed,
        Some(role) => match dispatch(role) {
            Dispatch::Dashboard(path) => GuardOutcome::RedirectDashboard(path),
            Dispatch::Deny => GuardOutcome::RedirectLogin,
        },
        None => GuardOutcome::RedirectLogin,
    }
}

#[derive(Default)]
struct Evaluations {
    cells: HashMap<NavigationId, Arc<OnceCell<GuardOutcome>>>,
    order: VecDeque<NavigationId>,
}

/// Route guard service
pub struct RouteGuard<R, N>
where
    R: RoleSource,
    N: Navigator,
{
    resolver: Arc<R>,
    navigator: Arc<N>,
    login_path: String,
    history: usize,
    evaluations: Mutex<Evaluations>,
}

impl<R, N> RouteGuard<R, N>
where
    R: RoleSource + Sync,
    N: Navigator,
{
    pub fn new(resolver: Arc<R>, navigator: Arc<N>, login_path: impl Into<String>, history: usize) -> Self {
        Self {
            resolver,
            navigator,
            login_path: login_path.into(),
            history: history.max(1),
            evaluations: Mutex::new(Evaluations::default()),
        }
    }

    /// Decide whether `navigation` may activate a route under `policy`
    ///
    /// Any redirect has already been issued when this returns `false`.
    pub async fn can_activate(&self, navigation: NavigationId, policy: &RouteAccessPolicy) -> bool {
        self.check(navigation, policy).await.proceed()
    }

    /// Like [`Self::can_activate`], returning the full outcome
    pub async fn check(&self, navigation: NavigationId, policy: &RouteAccessPolicy) -> GuardOutcome {
        let cell = self.cell_for(navigation);
        cell.get_or_init(|| self.evaluate(navigation, policy))
            .await
            .clone()
    }

    /// Current state of a tracked navigation
    pub fn state(&self, navigation: NavigationId) -> Option<GuardState> {
        let evaluations = self.evaluations.lock().unwrap_or_else(PoisonError::into_inner);
        evaluations.cells.get(&navigation).map(|cell| match cell.get() {
            Some(outcome) => GuardState::Decided(outcome.clone()),
            None => GuardState::Evaluating,
        })
    }

    /// Forget a navigation once the router has settled it
    pub fn finish(&self, navigation: NavigationId) {
        let mut evaluations = self.evaluations.lock().unwrap_or_else(PoisonError::into_inner);
        evaluations.cells.remove(&navigation);
        evaluations.order.retain(|id| *id != navigation);
    }

    fn cell_for(&self, navigation: NavigationId) -> Arc<OnceCell<GuardOutcome>> {
        let mut guard = self.evaluations.lock().unwrap_or_else(PoisonError::into_inner);
        let evaluations = &mut *guard;
        if let Some(cell) = evaluations.cells.get(&navigation) {
            return cell.clone();
        }

        let cell = Arc::new(OnceCell::new());
        evaluations.cells.insert(navigation, cell.clone());
        evaluations.order.push_back(navigation);

        // Pending evaluations are never evicted; the history may overflow
        // until they settle.
        while evaluations.order.len() > self.history {
            let cells = &evaluations.cells;
            let Some(pos) = evaluations
                .order
                .iter()
                .position(|id| cells.get(id).is_none_or(|entry| entry.initialized()))
            else {
                break;
            };
            if let Some(oldest) = evaluations.order.remove(pos) {
                evaluations.cells.remove(&oldest);
            }
        }
        cell
    }

    async fn evaluate(&self, navigation: NavigationId, policy: &RouteAccessPolicy) -> GuardOutcome {
        let role = match self.resolver.get_user_role().await {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!(navigation = %navigation, error = %e, "Role resolution failed");
                None
            }
        };

        let outcome = decide(role, policy);
        match &outcome {
            GuardOutcome::Allowed => {}
            GuardOutcome::RedirectDashboard(path) => self.navigator.navigate(path),
            GuardOutcome::RedirectLogin => self.navigator.navigate(&self.login_path),
        }

        tracing::debug!(navigation = %navigation, role = ?role, outcome = ?outcome, "Guard decision");
        outcome
    }
}
