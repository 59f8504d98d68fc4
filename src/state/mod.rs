//! State management module
//!
//! Holds the per-session state shared between the HTTP handlers and the
//! tick loop.

pub mod app_state;

pub use app_state::AppState;
