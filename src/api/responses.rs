//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    access::{NavItem, Role},
    timer::{BookingDraft, TimerSnapshot},
};

/// Timer state as returned by every timer endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub timer: TimerSnapshot,
    /// Elapsed time as `HH:MM:SS`
    pub display: String,
}

impl TimerResponse {
    pub fn new(timer: TimerSnapshot) -> Self {
        Self {
            display: timer.display(),
            timer,
        }
    }
}

/// Response to stopping the timer, carrying the booking draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub timer: TimerSnapshot,
    pub display: String,
    pub booking: BookingDraft,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub role: Option<Role>,
    pub items: Vec<&'static NavItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub role: Option<Role>,
    pub permission: String,
    pub allowed: bool,
}

/// Body of `PUT /modules/:key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleToggle {
    pub enabled: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}
