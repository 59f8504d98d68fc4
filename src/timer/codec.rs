//! Storage format for the timer
//!
//! The persisted value is a JSON object with camelCase fields and ISO-8601
//! timestamps, e.g.
//!
//! ```json
//! {"isRunning":true,"isPaused":false,"elapsedSeconds":100,
//!  "startTime":"2024-03-01T08:00:00.000Z","isOpen":false,
//!  "lastSaved":"2024-03-01T08:01:40.000Z"}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::TimerSnapshot;

/// Storage key the timer lives under
pub const TIMER_STORAGE_KEY: &str = "workclock.timer-state";

/// The record as it sits in storage. Timestamps stay strings here so a bad
/// timestamp does not make the whole record unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTimer {
    pub is_running: bool,
    pub is_paused: bool,
    pub elapsed_seconds: u64,
    pub start_time: Option<String>,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub last_saved: Option<String>,
}

impl PersistedTimer {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved.as_deref().and_then(parse_timestamp)
    }
}

/// Serialize a snapshot, stamping it with `saved_at`
pub fn encode_record(
    snapshot: &TimerSnapshot,
    saved_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let record = PersistedTimer {
        is_running: snapshot.is_running,
        is_paused: snapshot.is_paused,
        elapsed_seconds: snapshot.elapsed_seconds,
        start_time: snapshot.start_time.map(format_timestamp),
        is_open: snapshot.is_open,
        last_saved: Some(format_timestamp(saved_at)),
    };
    serde_json::to_string(&record)
}

/// Parse a stored value. Anything unreadable yields `None`.
pub fn decode_record(raw: &str) -> Option<PersistedTimer> {
    match serde_json::from_str(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Discarding malformed timer record: {}", e);
            None
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring malformed timestamp {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn encodes_camel_case_with_iso_timestamps() {
        let snapshot = TimerSnapshot {
            is_running: true,
            is_paused: false,
            elapsed_seconds: 100,
            start_time: Some(at(8, 0, 0)),
            is_open: true,
        };
        let raw = encode_record(&snapshot, at(8, 1, 40)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["isRunning"], true);
        assert_eq!(value["isPaused"], false);
        assert_eq!(value["elapsedSeconds"], 100);
        assert_eq!(value["startTime"], "2024-03-01T08:00:00.000Z");
        assert_eq!(value["isOpen"], true);
        assert_eq!(value["lastSaved"], "2024-03-01T08:01:40.000Z");
    }

    #[test]
    fn null_start_time_stays_null() {
        let raw = encode_record(&TimerSnapshot::default(), at(9, 0, 0)).unwrap();
        let record = decode_record(&raw).unwrap();
        assert_eq!(record.start_time, None);
        assert_eq!(record.start_time(), None);
        assert_eq!(record.last_saved(), Some(at(9, 0, 0)));
    }

    #[test]
    fn accepts_offset_timestamps() {
        let raw = r#"{"isRunning":true,"isPaused":false,"elapsedSeconds":5,
            "startTime":"2024-03-01T10:00:00+02:00","isOpen":false,
            "lastSaved":"2024-03-01T08:00:05Z"}"#;
        let record = decode_record(raw).unwrap();
        assert_eq!(record.start_time(), Some(at(8, 0, 0)));
        assert_eq!(record.last_saved(), Some(at(8, 0, 5)));
    }

    #[test]
    fn rejects_garbage_and_negative_elapsed() {
        assert_eq!(decode_record("not json"), None);
        assert_eq!(decode_record("{}"), None);
        assert_eq!(
            decode_record(r#"{"isRunning":false,"isPaused":false,"elapsedSeconds":-4,"startTime":null}"#),
            None
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let record = decode_record(
            r#"{"isRunning":false,"isPaused":false,"elapsedSeconds":12,"startTime":null}"#,
        )
        .unwrap();
        assert!(!record.is_open);
        assert_eq!(record.last_saved, None);
    }

    #[test]
    fn malformed_timestamps_read_as_none() {
        let record = decode_record(
            r#"{"isRunning":true,"isPaused":false,"elapsedSeconds":1,
                "startTime":"yesterday","lastSaved":"soon"}"#,
        )
        .unwrap();
        assert_eq!(record.start_time(), None);
        assert_eq!(record.last_saved(), None);
    }
}
