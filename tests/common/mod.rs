use std::sync::Arc;

use chrono::{TimeZone, Utc};
use workclock::{
    access::{ModulePolicy, Role, StaticSession},
    clock::ManualClock,
    state::AppState,
    store::MemoryStore,
    timer::TimerEngine,
};

pub struct Harness {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(role: Option<Role>, modules: ModulePolicy) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    ));
    let session = match role {
        Some(role) => StaticSession::new(role),
        None => StaticSession::anonymous(),
    };
    let state = load_state(&store, &clock, session, modules);
    Harness { state, store, clock }
}

/// Build a fresh `AppState` over an existing store, as a restart would
pub fn load_state(
    store: &Arc<MemoryStore>,
    clock: &Arc<ManualClock>,
    session: StaticSession,
    modules: ModulePolicy,
) -> Arc<AppState> {
    let engine = TimerEngine::load(store.clone(), clock.clone());
    AppState::new(
        engine,
        modules,
        Arc::new(session),
        clock.clone(),
        "127.0.0.1".to_string(),
        0,
    )
}
