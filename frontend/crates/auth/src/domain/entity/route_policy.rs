//! Route Access Policy
//!
//! Declared once per protected route; immutable afterwards.

use std::collections::BTreeSet;

use crate::domain::value_object::user_role::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccessPolicy {
    allowed_roles: BTreeSet<Role>,
}

impl RouteAccessPolicy {
    /// Any authenticated user with a recognized role
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
        }
    }

    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.allowed_roles
    }

    /// An empty set admits every known role; `Unknown` is never admitted.
    pub fn permits(&self, role: Role) -> bool {
        role.is_known() && (self.allowed_roles.is_empty() || self.allowed_roles.contains(&role))
    }
}
