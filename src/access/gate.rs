//! Visibility checks
//!
//! None of these fail: an unknown role, a missing permission or a disabled
//! module is simply "not visible".

use tracing::debug;

use super::{ModuleSettings, NavItem, Permission, Role, SessionProvider};

/// Whether `role` holds `permission`. No role means no access.
pub fn has_permission(role: Option<Role>, permission: Permission) -> bool {
    role.is_some_and(|r| r.has(permission))
}

/// Whether `item` is shown to `role` given the module states
pub fn is_item_visible(role: Option<Role>, item: &NavItem, modules: &dyn ModuleSettings) -> bool {
    has_permission(role, item.permission)
        && item.module.map_or(true, |key| modules.is_module_enabled(key))
}

/// Access checks bound to one session and one set of module states
pub struct AccessGate<'a> {
    role: Option<Role>,
    modules: &'a dyn ModuleSettings,
}

impl<'a> AccessGate<'a> {
    pub fn new(session: &dyn SessionProvider, modules: &'a dyn ModuleSettings) -> Self {
        Self::for_role(session.current_role(), modules)
    }

    pub fn for_role(role: Option<Role>, modules: &'a dyn ModuleSettings) -> Self {
        Self { role, modules }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn can(&self, permission: Permission) -> bool {
        let allowed = has_permission(self.role, permission);
        debug!("Permission {} for {:?}: {}", permission, self.role, allowed);
        allowed
    }

    /// Check a permission given as a string token; unknown tokens are denied
    pub fn can_token(&self, token: &str) -> bool {
        token.parse().map(|p| self.can(p)).unwrap_or(false)
    }

    pub fn is_visible(&self, item: &NavItem) -> bool {
        is_item_visible(self.role, item, self.modules)
    }

    /// The visible subset of `items`, order kept
    pub fn visible_items<'i>(&self, items: &'i [NavItem]) -> Vec<&'i NavItem> {
        items.iter().filter(|item| self.is_visible(item)).collect()
    }
}
