//! HTTP API module
//!
//! The page surface: every endpoint is a thin wrapper over a `Surface` command.

pub mod handlers;
pub mod responses;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/skip", post(skip_handler))
        .route("/timer/phase/:phase", post(switch_phase_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
