//! HTTP API module
//!
//! Thin HTTP surface over the timer and the access checks, used by the
//! booking dialog and the navigation shell.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/open", post(open_handler))
        .route("/timer/close", post(close_handler))
        .route("/navigation", get(navigation_handler))
        .route("/permissions/:token", get(permission_handler))
        .route("/modules", get(modules_handler))
        .route("/modules/:key", put(module_toggle_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
