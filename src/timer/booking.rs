//! Booking draft handed to the time-entry dialog when the timer stops

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::TimerSnapshot;

/// Pre-filled values for a time entry built from a stopped timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    /// Elapsed time in hours, two decimals
    pub hours: f64,
}

impl BookingDraft {
    /// Build a draft ending at `ended_at`. Without a recorded start time the
    /// start is back-dated by the elapsed total, or left at `ended_at` when
    /// that would fall outside the representable range.
    pub fn from_snapshot(snapshot: &TimerSnapshot, ended_at: DateTime<Utc>) -> Self {
        let elapsed_seconds = snapshot.elapsed_seconds;
        let started_at = snapshot.start_time.unwrap_or_else(|| {
            i64::try_from(elapsed_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|elapsed| ended_at.checked_sub_signed(elapsed))
                .unwrap_or(ended_at)
        });

        Self {
            started_at,
            ended_at,
            elapsed_seconds,
            hours: (elapsed_seconds as f64 / 36.0).round() / 100.0,
        }
    }
}
