//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    access::{ModulePolicy, Permission},
    state::AppState,
    timer::TimerSnapshot,
};
use super::responses::{
    HealthResponse, ModuleToggle, NavigationResponse, PermissionResponse, StopResponse, TimerResponse,
};

/// Reject the request unless the session holds `permission`
fn require(state: &AppState, permission: Permission) -> Result<(), StatusCode> {
    match state.can(permission) {
        Ok(true) => Ok(()),
        Ok(false) => {
            warn!("Denied: session lacks {}", permission);
            Err(StatusCode::FORBIDDEN)
        }
        Err(e) => {
            error!("Failed to check permission {}: {}", permission, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn timer_result(action: &str, result: Result<TimerSnapshot, String>) -> Result<Json<TimerResponse>, StatusCode> {
    match result {
        Ok(snapshot) => Ok(Json(TimerResponse::new(snapshot))),
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("read", state.get_timer())
}

/// Handle POST /timer/start - Start or resume the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("start", state.start_timer())
}

/// Handle POST /timer/pause - Toggle pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("pause", state.pause_timer())
}

/// Handle POST /timer/stop - Stop and hand back a booking draft
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    match state.stop_timer() {
        Ok((timer, booking)) => {
            info!("Timer stopped, {}h ready to book", booking.hours);
            Ok(Json(StopResponse {
                display: timer.display(),
                timer,
                booking,
            }))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/reset - Zero the timer and forget the saved state
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("reset", state.reset_timer())
}

/// Handle POST /timer/open - Show the timer panel
pub async fn open_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("open", state.set_timer_open(true))
}

/// Handle POST /timer/close - Hide the timer panel
pub async fn close_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    require(&state, Permission::TrackTime)?;
    timer_result("close", state.set_timer_open(false))
}

/// Handle GET /navigation - Sections visible to the session
pub async fn navigation_handler(State(state): State<Arc<AppState>>) -> Result<Json<NavigationResponse>, StatusCode> {
    match state.visible_navigation() {
        Ok(items) => Ok(Json(NavigationResponse {
            role: state.current_role(),
            items,
        })),
        Err(e) => {
            error!("Failed to build navigation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /permissions/:token - Check a single permission token
pub async fn permission_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<PermissionResponse>, StatusCode> {
    match state.has_permission(&token) {
        Ok(allowed) => Ok(Json(PermissionResponse {
            role: state.current_role(),
            permission: token,
            allowed,
        })),
        Err(e) => {
            error!("Failed to check permission {}: {}", token, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /modules - Explicitly known module states
pub async fn modules_handler(State(state): State<Arc<AppState>>) -> Result<Json<ModulePolicy>, StatusCode> {
    match state.get_modules() {
        Ok(modules) => Ok(Json(modules)),
        Err(e) => {
            error!("Failed to read module settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /modules/:key - Enable or disable a module
pub async fn module_toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(toggle): Json<ModuleToggle>,
) -> Result<Json<ModulePolicy>, StatusCode> {
    require(&state, Permission::ManageModules)?;
    match state.set_module(&key, toggle.enabled) {
        Ok(modules) => Ok(Json(modules)),
        Err(e) => {
            error!("Failed to update module {}: {}", key, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
