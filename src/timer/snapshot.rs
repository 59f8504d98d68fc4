//! Timer snapshot structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the rest of the application may read about the timer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Started and not stopped
    pub is_running: bool,
    /// Only ever true while `is_running`
    pub is_paused: bool,
    pub elapsed_seconds: u64,
    /// Instant of the first start since the last reset
    pub start_time: Option<DateTime<Utc>>,
    /// Whether the timer panel is shown; has no effect on timing
    pub is_open: bool,
}

impl TimerSnapshot {
    /// True when time should accrue
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

/// Format a number of seconds as `HH:MM:SS`. Hours keep growing past 24.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
