//! Workclock server entry point

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use workclock::{
    access::{ModulePolicy, SessionProvider, StaticSession},
    api::create_router,
    clock::SystemClock,
    config::Config,
    state::AppState,
    store::FileStore,
    timer::TimerEngine,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("workclock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting workclock v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, store={}, role={}",
          config.host, config.port, config.store.display(), config.role);

    let session = StaticSession::from_token(&config.role);
    if session.current_role().is_none() {
        warn!("Unknown role '{}', every section will be hidden", config.role);
    }

    let store = Arc::new(FileStore::open(&config.store)?);
    let clock = Arc::new(SystemClock);
    let engine = TimerEngine::load(store, clock.clone());
    let modules = ModulePolicy::with_disabled(config.disabled_modules.iter().cloned());

    let state = AppState::new(
        engine,
        modules,
        Arc::new(session),
        clock,
        config.host.clone(),
        config.port,
    );

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = wait_for_shutdown() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.shutdown() {
        error!("Failed to save timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Without signal handling keep serving; the process can still be killed
async fn wait_for_shutdown() {
    if let Err(e) = shutdown_signal().await {
        error!("Failed to listen for signals: {}", e);
        std::future::pending::<()>().await;
    }
}
