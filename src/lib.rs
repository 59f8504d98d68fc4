//! Workclock - persistent work timer and role-gated navigation
//!
//! The timer keeps counting across restarts by saving itself after every
//! change and catching up on wall-clock time when it is loaded again. The
//! access checks decide which sections a role may see, given which feature
//! modules are switched on.

pub mod access;
pub mod api;
pub mod clock;
pub mod config;
pub mod state;
pub mod store;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use access::{AccessGate, ModulePolicy, Permission, Role};
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use timer::{TimerEngine, TimerSnapshot};
pub use utils::signals::shutdown_signal;
