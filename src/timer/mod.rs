//! Work timer
//!
//! A single elapsed-time counter per session that keeps counting across
//! restarts by persisting itself after every change and catching up on the
//! wall-clock gap when it is loaded again.

pub mod booking;
pub mod codec;
pub mod engine;
pub mod snapshot;

pub use booking::BookingDraft;
pub use codec::{decode_record, encode_record, PersistedTimer, TIMER_STORAGE_KEY};
pub use engine::TimerEngine;
pub use snapshot::{format_elapsed, TimerSnapshot};
