//! Role Resolver
//!
//! Answers "what role is the current user?" for the route guard.

use std::sync::Arc;

use chrono::Utc;
use platform::storage::DurableStore;

use crate::application::auth_gateway::AuthGateway;
use crate::domain::port::IdentityProvider;
use crate::domain::value_object::user_role::Role;
use crate::error::{AuthError, AuthResult};

/// Source of the current user's role
///
/// `Err(NoSession)` means unauthenticated, which is distinct from
/// `Ok(Role::Unknown)`.
#[trait_variant::make(RoleSource: Send)]
pub trait LocalRoleSource {
    async fn get_user_role(&self) -> AuthResult<Role>;
}

/// Role resolver backed by the session store and the gateway's refresh path
pub struct RoleResolver<P, S>
where
    P: IdentityProvider,
    S: DurableStore,
{
    gateway: Arc<AuthGateway<P, S>>,
}

impl<P, S> RoleResolver<P, S>
where
    P: IdentityProvider,
    S: DurableStore,
{
    pub fn new(gateway: Arc<AuthGateway<P, S>>) -> Self {
        Self { gateway }
    }
}

impl<P, S> RoleSource for RoleResolver<P, S>
where
    P: IdentityProvider + Send + Sync,
    S: DurableStore,
{
    async fn get_user_role(&self) -> AuthResult<Role> {
        let store = self.gateway.session_store();
        let skew = self.gateway.config().expiry_skew_chrono();

        if store.get_session().is_none() {
            return Err(AuthError::NoSession);
        }
        if let Some(session) = store.active_session(Utc::now(), skew) {
            return Ok(session.role);
        }

        // Present but expired: one refresh attempt.
        match self.gateway.refresh_session().await {
            Ok(session) => Ok(session.role),
            Err(e) => {
                tracing::debug!(error = %e, "Role lookup found no valid session");
                Err(AuthError::NoSession)
            }
        }
    }
}
