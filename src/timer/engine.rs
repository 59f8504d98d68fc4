//! Timer state machine and its persistence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{
    codec::{decode_record, encode_record, PersistedTimer, TIMER_STORAGE_KEY},
    TimerSnapshot,
};
use crate::{clock::Clock, store::KeyValueStore};

/// Owns one session's timer.
///
/// Every change is written to the store together with the instant it was
/// saved. Loading a running timer adds the whole seconds that passed since
/// that instant, so time keeps accruing while nothing is ticking.
///
/// Storage is best effort: a failed write is logged and the in-memory state
/// stays authoritative. Two engines sharing one store overwrite each other.
pub struct TimerEngine {
    snapshot: TimerSnapshot,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
}

impl TimerEngine {
    /// Load the timer from `store` under the default key
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::load_with_key(store, clock, TIMER_STORAGE_KEY)
    }

    /// Load the timer stored under `key`, reconciling against the clock
    pub fn load_with_key(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let raw = match store.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read timer state, starting fresh: {}", e);
                None
            }
        };

        let snapshot = match raw.as_deref().and_then(decode_record) {
            Some(record) => reconcile(record, clock.now()),
            None => TimerSnapshot::default(),
        };

        info!(
            "Timer loaded: running={}, paused={}, elapsed={}s",
            snapshot.is_running, snapshot.is_paused, snapshot.elapsed_seconds
        );

        Self {
            snapshot,
            store,
            clock,
            key,
        }
    }

    pub fn snapshot(&self) -> &TimerSnapshot {
        &self.snapshot
    }

    pub fn is_ticking(&self) -> bool {
        self.snapshot.is_ticking()
    }

    /// Start or resume. Keeps an existing start time.
    pub fn start(&mut self) {
        if self.snapshot.is_ticking() {
            return;
        }
        self.snapshot.is_running = true;
        self.snapshot.is_paused = false;
        if self.snapshot.start_time.is_none() {
            self.snapshot.start_time = Some(self.clock.now());
        }
        info!("Timer started at {}s", self.snapshot.elapsed_seconds);
        self.persist();
    }

    /// Toggle pause. Does nothing while the timer is not running.
    pub fn pause(&mut self) {
        if !self.snapshot.is_running {
            debug!("Pause ignored, timer is not running");
            return;
        }
        self.snapshot.is_paused = !self.snapshot.is_paused;
        info!(
            "Timer {} at {}s",
            if self.snapshot.is_paused { "paused" } else { "resumed" },
            self.snapshot.elapsed_seconds
        );
        self.persist();
    }

    /// Stop ticking but keep the total and the start time for booking
    pub fn stop(&mut self) {
        self.snapshot.is_running = false;
        self.snapshot.is_paused = false;
        info!("Timer stopped at {}s", self.snapshot.elapsed_seconds);
        self.persist();
    }

    /// Zero the timer and erase the stored record
    pub fn reset(&mut self) {
        self.snapshot = TimerSnapshot {
            is_open: self.snapshot.is_open,
            ..TimerSnapshot::default()
        };
        if let Err(e) = self.store.remove(&self.key) {
            warn!("Failed to erase timer state: {}", e);
        }
        info!("Timer reset");
    }

    /// Add one second if the timer is ticking. Returns whether it did.
    pub fn tick(&mut self) -> bool {
        if !self.snapshot.is_ticking() {
            return false;
        }
        self.snapshot.elapsed_seconds = self.snapshot.elapsed_seconds.saturating_add(1);
        debug!("Tick: {}s", self.snapshot.elapsed_seconds);
        self.persist();
        true
    }

    /// Show or hide the timer panel
    pub fn set_open(&mut self, open: bool) {
        if self.snapshot.is_open == open {
            return;
        }
        self.snapshot.is_open = open;
        self.persist();
    }

    /// Write the current snapshot with a fresh `lastSaved`
    pub fn persist(&self) {
        let raw = match encode_record(&self.snapshot, self.clock.now()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode timer state: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &raw) {
            warn!("Failed to save timer state: {}", e);
        }
    }
}

/// Rebuild a snapshot from storage. A running, unpaused timer with a start
/// time gains the whole seconds between `lastSaved` and `now`; anything else
/// is restored as-is.
fn reconcile(record: PersistedTimer, now: DateTime<Utc>) -> TimerSnapshot {
    let start_time = record.start_time();
    let is_paused = record.is_running && record.is_paused;
    let mut elapsed_seconds = record.elapsed_seconds;

    if record.is_running && !is_paused && start_time.is_some() {
        let gap = record
            .last_saved()
            .map(|saved| whole_seconds_between(saved, now))
            .unwrap_or(0);
        if gap > 0 {
            info!("Catching up {}s accrued while the timer was unloaded", gap);
        }
        elapsed_seconds = elapsed_seconds.saturating_add(gap);
    }

    TimerSnapshot {
        is_running: record.is_running,
        is_paused,
        elapsed_seconds,
        start_time,
        is_open: record.is_open,
    }
}

/// Floor of the seconds from `from` to `to`, zero if the clock went backwards
fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        store::{MemoryStore, StoreError},
    };
    use chrono::{Duration, TimeZone};

    /// A store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
            Self {
                store: Arc::new(MemoryStore::new()),
                clock: Arc::new(ManualClock::new(start)),
            }
        }

        fn engine(&self) -> TimerEngine {
            TimerEngine::load(self.store.clone(), self.clock.clone())
        }

        fn stored(&self) -> Option<PersistedTimer> {
            self.store
                .get(TIMER_STORAGE_KEY)
                .unwrap()
                .as_deref()
                .and_then(decode_record)
        }

        fn tick_n(&self, engine: &mut TimerEngine, n: u32) {
            for _ in 0..n {
                self.clock.advance(Duration::seconds(1));
                engine.tick();
            }
        }
    }

    #[test]
    fn fresh_load_is_stopped() {
        let fx = Fixture::new();
        let engine = fx.engine();
        assert_eq!(engine.snapshot(), &TimerSnapshot::default());
        assert!(fx.stored().is_none());
    }

    #[test]
    fn ticks_add_exactly_one_second_each() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();

        let mut last = engine.snapshot().elapsed_seconds;
        for _ in 0..10 {
            assert!(engine.tick());
            let now = engine.snapshot().elapsed_seconds;
            assert_eq!(now, last + 1);
            last = now;
        }
    }

    #[test]
    fn ticks_do_nothing_when_stopped() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        assert!(!engine.tick());
        assert_eq!(engine.snapshot().elapsed_seconds, 0);
    }

    #[test]
    fn start_sets_start_time_once() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        let first = fx.clock.now();
        engine.start();
        assert_eq!(engine.snapshot().start_time, Some(first));

        fx.tick_n(&mut engine, 5);
        engine.stop();
        engine.start();
        assert_eq!(engine.snapshot().start_time, Some(first));
    }

    #[test]
    fn start_while_running_is_idempotent() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 3);
        let before = engine.snapshot().clone();
        engine.start();
        assert_eq!(engine.snapshot(), &before);
    }

    #[test]
    fn pause_freezes_time_until_toggled_back() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 4);

        engine.pause();
        assert!(engine.snapshot().is_paused);
        for _ in 0..20 {
            assert!(!engine.tick());
        }
        assert_eq!(engine.snapshot().elapsed_seconds, 4);

        engine.pause();
        assert!(!engine.snapshot().is_paused);
        assert!(engine.tick());
        assert_eq!(engine.snapshot().elapsed_seconds, 5);
    }

    #[test]
    fn start_resumes_a_paused_timer() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        engine.pause();
        engine.start();
        assert!(engine.is_ticking());
    }

    #[test]
    fn pause_when_not_running_keeps_invariant() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.pause();
        assert!(!engine.snapshot().is_paused);
        assert!(!engine.snapshot().is_running);
    }

    #[test]
    fn stop_preserves_total() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 50);
        engine.stop();
        assert!(!engine.snapshot().is_running);
        assert!(!engine.tick());
        assert_eq!(engine.snapshot().elapsed_seconds, 50);

        engine.start();
        engine.tick();
        assert_eq!(engine.snapshot().elapsed_seconds, 51);
    }

    #[test]
    fn every_mutation_is_persisted_with_last_saved() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 2);

        let stored = fx.stored().unwrap();
        assert!(stored.is_running);
        assert_eq!(stored.elapsed_seconds, 2);
        assert_eq!(stored.last_saved(), Some(fx.clock.now()));

        engine.set_open(true);
        assert!(fx.stored().unwrap().is_open);
    }

    #[test]
    fn reload_catches_up_on_wall_clock_gap() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 100);
        drop(engine);

        fx.clock.advance(Duration::seconds(37));
        let engine = fx.engine();
        assert_eq!(engine.snapshot().elapsed_seconds, 137);
        assert!(engine.is_ticking());
    }

    #[test]
    fn reload_floors_sub_second_gap() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 10);
        drop(engine);

        fx.clock.advance(Duration::milliseconds(2_999));
        assert_eq!(fx.engine().snapshot().elapsed_seconds, 12);
    }

    #[test]
    fn reload_while_paused_or_stopped_adds_nothing() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 10);
        engine.pause();
        drop(engine);

        fx.clock.advance(Duration::hours(3));
        let mut engine = fx.engine();
        assert_eq!(engine.snapshot().elapsed_seconds, 10);
        assert!(engine.snapshot().is_paused);

        engine.pause();
        engine.stop();
        drop(engine);
        fx.clock.advance(Duration::hours(3));
        let engine = fx.engine();
        assert_eq!(engine.snapshot().elapsed_seconds, 10);
        assert!(!engine.snapshot().is_running);
    }

    #[test]
    fn reset_erases_storage() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 30);
        engine.reset();

        assert_eq!(fx.store.get(TIMER_STORAGE_KEY).unwrap(), None);
        assert_eq!(engine.snapshot().elapsed_seconds, 0);
        assert_eq!(engine.snapshot().start_time, None);
        assert!(!engine.snapshot().is_running);

        fx.clock.advance(Duration::minutes(5));
        assert_eq!(fx.engine().snapshot(), &TimerSnapshot::default());
    }

    #[test]
    fn malformed_record_loads_default() {
        let fx = Fixture::new();
        fx.store.set(TIMER_STORAGE_KEY, "{broken").unwrap();
        assert_eq!(fx.engine().snapshot(), &TimerSnapshot::default());
    }

    #[test]
    fn missing_or_bad_last_saved_means_no_gap() {
        let fx = Fixture::new();
        fx.store
            .set(
                TIMER_STORAGE_KEY,
                r#"{"isRunning":true,"isPaused":false,"elapsedSeconds":42,
                    "startTime":"2024-03-01T07:00:00.000Z","isOpen":false}"#,
            )
            .unwrap();
        assert_eq!(fx.engine().snapshot().elapsed_seconds, 42);

        fx.store
            .set(
                TIMER_STORAGE_KEY,
                r#"{"isRunning":true,"isPaused":false,"elapsedSeconds":42,
                    "startTime":"2024-03-01T07:00:00.000Z","isOpen":false,
                    "lastSaved":"garbage"}"#,
            )
            .unwrap();
        assert_eq!(fx.engine().snapshot().elapsed_seconds, 42);
    }

    #[test]
    fn clock_moving_backwards_adds_nothing() {
        let fx = Fixture::new();
        let mut engine = fx.engine();
        engine.start();
        fx.tick_n(&mut engine, 8);
        drop(engine);

        fx.clock.advance(Duration::seconds(-60));
        assert_eq!(fx.engine().snapshot().elapsed_seconds, 8);
    }

    #[test]
    fn running_without_start_time_is_not_caught_up() {
        let fx = Fixture::new();
        fx.store
            .set(
                TIMER_STORAGE_KEY,
                r#"{"isRunning":true,"isPaused":false,"elapsedSeconds":5,
                    "startTime":null,"isOpen":false,
                    "lastSaved":"2024-03-01T07:00:00.000Z"}"#,
            )
            .unwrap();
        let engine = fx.engine();
        assert_eq!(engine.snapshot().elapsed_seconds, 5);
        assert!(engine.snapshot().is_running);
    }

    #[test]
    fn stored_pause_without_run_is_normalised() {
        let fx = Fixture::new();
        fx.store
            .set(
                TIMER_STORAGE_KEY,
                r#"{"isRunning":false,"isPaused":true,"elapsedSeconds":5,"startTime":null}"#,
            )
            .unwrap();
        let engine = fx.engine();
        assert!(!engine.snapshot().is_paused);
    }

    #[test]
    fn two_engines_on_one_key_last_write_wins() {
        let fx = Fixture::new();
        let mut first = fx.engine();
        let mut second = fx.engine();

        first.start();
        fx.tick_n(&mut first, 3);
        second.set_open(true);

        let stored = fx.stored().unwrap();
        assert!(!stored.is_running);
        assert!(stored.is_open);
        assert_eq!(stored.elapsed_seconds, 0);
    }

    #[test]
    fn broken_store_never_stops_the_timer() {
        let fx = Fixture::new();
        let mut engine = TimerEngine::load(Arc::new(BrokenStore), fx.clock.clone());
        assert_eq!(engine.snapshot(), &TimerSnapshot::default());

        engine.start();
        assert!(engine.is_ticking());
        assert_eq!(engine.snapshot().start_time, Some(fx.clock.now()));

        fx.tick_n(&mut engine, 3);
        assert_eq!(engine.snapshot().elapsed_seconds, 3);

        engine.pause();
        assert!(engine.snapshot().is_paused);
        engine.stop();
        engine.set_open(true);
        assert!(!engine.snapshot().is_running);
        assert!(engine.snapshot().is_open);
        assert_eq!(engine.snapshot().elapsed_seconds, 3);

        engine.reset();
        assert_eq!(engine.snapshot().elapsed_seconds, 0);
        assert_eq!(engine.snapshot().start_time, None);
        assert!(!engine.snapshot().is_running);
    }
}
