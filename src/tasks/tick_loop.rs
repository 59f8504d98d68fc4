//! One-second tick loop for a running timer

use std::{sync::Arc, time::Duration};
use tokio::{
    task::{self, JoinHandle},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::AppState;

/// Cadence of the timer
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the loop for `generation`; it exits on its own once the timer stops
/// ticking or a newer loop replaces it.
pub fn spawn_tick_loop(state: Arc<AppState>, generation: u64) -> JoinHandle<()> {
    tokio::spawn(tick_loop(state, generation))
}

async fn tick_loop(state: Arc<AppState>, generation: u64) {
    debug!("Tick loop {} started", generation);

    let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    // Ticks missed while the process was stalled are dropped, not replayed
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        // A tick persists the timer, which may block on file I/O
        let ticker = Arc::clone(&state);
        match task::spawn_blocking(move || ticker.tick(generation)).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => break,
            Ok(Err(e)) => {
                error!("Tick failed: {}", e);
                break;
            }
            Err(e) => {
                error!("Tick task failed: {}", e);
                break;
            }
        }
    }

    debug!("Tick loop {} finished", generation);
}
