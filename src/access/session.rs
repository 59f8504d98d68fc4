//! Current-session identity

use super::Role;

/// Provides the role of whoever is using the application
pub trait SessionProvider: Send + Sync {
    /// `None` when nobody is signed in or the role is not recognised
    fn current_role(&self) -> Option<Role>;
}

/// A session whose role never changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSession {
    role: Option<Role>,
}

impl StaticSession {
    pub fn new(role: Role) -> Self {
        Self { role: Some(role) }
    }

    pub fn anonymous() -> Self {
        Self { role: None }
    }

    /// Build from a role token; unrecognised tokens give an anonymous session
    pub fn from_token(token: &str) -> Self {
        Self {
            role: token.parse().ok(),
        }
    }
}

impl SessionProvider for StaticSession {
    fn current_role(&self) -> Option<Role> {
        self.role
    }
}
