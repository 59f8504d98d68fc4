//! Main application state management

use std::{
    sync::{Arc, Mutex, RwLock},
    time::Instant,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    access::{AccessGate, ModuleChange, ModulePolicy, NavItem, Permission, Role, SessionProvider, NAVIGATION},
    clock::Clock,
    tasks::spawn_tick_loop,
    timer::{BookingDraft, TimerEngine, TimerSnapshot},
};

/// The timer engine together with the task that ticks it. Both sit behind
/// one lock so starting or cancelling the tick loop is decided on the same
/// state a tick would see.
struct TimerSlot {
    engine: TimerEngine,
    ticker: Option<JoinHandle<()>>,
    /// Bumped whenever the tick loop is replaced; a loop that sees a newer
    /// generation stops without ticking.
    generation: u64,
}

/// State shared by every request for one user session
pub struct AppState {
    timer: Mutex<TimerSlot>,
    modules: RwLock<ModulePolicy>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Latest timer snapshot after every change, ticks included
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Module toggles
    pub module_change_tx: broadcast::Sender<ModuleChange>,
}

impl AppState {
    /// Create the state around an already loaded engine.
    ///
    /// Must be called inside a tokio runtime; a timer that was running when
    /// it was persisted resumes ticking right away.
    pub fn new(
        engine: TimerEngine,
        modules: ModulePolicy,
        session: Arc<dyn SessionProvider>,
        clock: Arc<dyn Clock>,
        host: String,
        port: u16,
    ) -> Arc<Self> {
        let (timer_update_tx, _) = watch::channel(engine.snapshot().clone());
        let (module_change_tx, _) = broadcast::channel(32);

        let state = Arc::new(Self {
            timer: Mutex::new(TimerSlot {
                engine,
                ticker: None,
                generation: 0,
            }),
            modules: RwLock::new(modules),
            session,
            clock,
            start_time: Instant::now(),
            port,
            host,
            timer_update_tx,
            module_change_tx,
        });

        if let Err(e) = state.update_timer("load", |_| {}) {
            warn!("Failed to resume timer: {}", e);
        }
        state
    }

    /// Apply a change to the timer, publish the result and start or cancel
    /// the tick loop to match.
    pub fn update_timer<F>(self: &Arc<Self>, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut slot = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        updater(&mut slot.engine);
        let snapshot = slot.engine.snapshot().clone();
        self.sync_tick_loop(&mut slot);
        self.timer_update_tx.send_replace(snapshot.clone());
        drop(slot);

        info!("Timer action '{}': {}", action, snapshot.display());
        Ok(snapshot)
    }

    fn sync_tick_loop(self: &Arc<Self>, slot: &mut TimerSlot) {
        let alive = slot.ticker.as_ref().is_some_and(|h| !h.is_finished());
        if slot.engine.is_ticking() {
            if !alive {
                slot.generation += 1;
                slot.ticker = Some(spawn_tick_loop(Arc::clone(self), slot.generation));
            }
        } else if let Some(handle) = slot.ticker.take() {
            slot.generation += 1;
            handle.abort();
        }
    }

    /// One tick from the loop of `generation`. Returns false when that loop
    /// should exit.
    pub fn tick(&self, generation: u64) -> Result<bool, String> {
        let mut slot = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if slot.generation != generation || !slot.engine.tick() {
            return Ok(false);
        }
        self.timer_update_tx.send_replace(slot.engine.snapshot().clone());
        Ok(true)
    }

    pub fn start_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("start", TimerEngine::start)
    }

    pub fn pause_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("pause", TimerEngine::pause)
    }

    /// Stop the timer and build the draft for the booking dialog
    pub fn stop_timer(self: &Arc<Self>) -> Result<(TimerSnapshot, BookingDraft), String> {
        let snapshot = self.update_timer("stop", TimerEngine::stop)?;
        let draft = BookingDraft::from_snapshot(&snapshot, self.clock.now());
        Ok((snapshot, draft))
    }

    pub fn reset_timer(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        self.update_timer("reset", TimerEngine::reset)
    }

    pub fn set_timer_open(self: &Arc<Self>, open: bool) -> Result<TimerSnapshot, String> {
        self.update_timer(if open { "open" } else { "close" }, |engine| engine.set_open(open))
    }

    /// Get current timer snapshot
    pub fn get_timer(&self) -> Result<TimerSnapshot, String> {
        self.timer.lock()
            .map(|slot| slot.engine.snapshot().clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Cancel the tick loop and save the timer one last time
    pub fn shutdown(&self) -> Result<(), String> {
        let mut slot = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if let Some(handle) = slot.ticker.take() {
            handle.abort();
        }
        slot.generation += 1;
        slot.engine.persist();
        info!("Timer saved at {}s", slot.engine.snapshot().elapsed_seconds);
        Ok(())
    }

    pub fn current_role(&self) -> Option<Role> {
        self.session.current_role()
    }

    pub fn can(&self, permission: Permission) -> Result<bool, String> {
        self.with_gate(|gate| gate.can(permission))
    }

    /// Whether the session's role holds `token`; unknown tokens are denied
    pub fn has_permission(&self, token: &str) -> Result<bool, String> {
        self.with_gate(|gate| gate.can_token(token))
    }

    /// Navigation entries visible to the session right now
    pub fn visible_navigation(&self) -> Result<Vec<&'static NavItem>, String> {
        self.with_gate(|gate| gate.visible_items(NAVIGATION))
    }

    fn with_gate<T>(&self, check: impl FnOnce(&AccessGate<'_>) -> T) -> Result<T, String> {
        let modules = self.modules.read()
            .map_err(|e| format!("Failed to lock module settings: {}", e))?;
        let gate = AccessGate::new(self.session.as_ref(), &*modules);
        Ok(check(&gate))
    }

    /// Get the explicitly known module states
    pub fn get_modules(&self) -> Result<ModulePolicy, String> {
        self.modules.read()
            .map(|modules| modules.clone())
            .map_err(|e| format!("Failed to lock module settings: {}", e))
    }

    /// Switch a module on or off and notify listeners if that changed anything
    pub fn set_module(&self, key: &str, enabled: bool) -> Result<ModulePolicy, String> {
        let mut modules = self.modules.write()
            .map_err(|e| format!("Failed to lock module settings: {}", e))?;

        let changed = modules.set(key, enabled);
        let policy = modules.clone();
        drop(modules);

        if changed {
            info!("Module '{}' {}", key, if enabled { "enabled" } else { "disabled" });
            let change = ModuleChange { key: key.to_string(), enabled };
            if let Err(e) = self.module_change_tx.send(change) {
                // No subscribers is normal
                debug!("Module change not delivered: {}", e);
            }
        }
        Ok(policy)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
