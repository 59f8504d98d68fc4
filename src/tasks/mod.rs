//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick_loop;

// Re-export main functions
pub use tick_loop::{spawn_tick_loop, TICK_INTERVAL};
