//! Role and module based access
//!
//! Whether a feature is shown depends on two things: the permissions of the
//! session's role, and whether the module that owns the feature is enabled.

pub mod gate;
pub mod modules;
pub mod navigation;
pub mod role;
pub mod session;

pub use gate::{has_permission, is_item_visible, AccessGate};
pub use modules::{ModuleChange, ModulePolicy, ModuleSettings};
pub use navigation::{NavItem, NAVIGATION};
pub use role::{Permission, Role};
pub use session::{SessionProvider, StaticSession};
