//! HTTP endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    settings::TimerSettings,
    state::{AppState, Phase, TimerView},
};
use super::responses::{HealthResponse, TimerResponse};

type TimerResult = Result<Json<TimerResponse>, TimerError>;

fn respond(result: Result<TimerView, TimerError>, message: &str) -> TimerResult {
    match result {
        Ok(view) => Ok(Json(TimerResponse::new(message.to_string(), view))),
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(e)
        }
    }
}

/// Handle GET /timer - Current countdown, reconciled against storage
pub async fn timer_handler(State(state): State<AppState>) -> Json<TimerResponse> {
    let view = state.page.reconcile();
    Json(TimerResponse::new("Current timer".to_string(), view))
}

/// Handle POST /timer/start - Start or resume the current phase
pub async fn start_handler(State(state): State<AppState>) -> TimerResult {
    info!("Start endpoint called");
    respond(state.page.start(), "Timer started")
}

/// Handle POST /timer/pause - Freeze the countdown
pub async fn pause_handler(State(state): State<AppState>) -> TimerResult {
    info!("Pause endpoint called");
    respond(state.page.pause(), "Timer paused")
}

/// Handle POST /timer/reset - Discard the timer record
pub async fn reset_handler(State(state): State<AppState>) -> TimerResult {
    info!("Reset endpoint called");
    respond(state.page.reset(), "Timer reset")
}

/// Handle POST /timer/skip - Complete the current phase early
pub async fn skip_handler(State(state): State<AppState>) -> TimerResult {
    info!("Skip endpoint called");
    respond(state.page.skip(), "Phase skipped")
}

/// Handle POST /timer/phase/:phase - Manually switch phase
pub async fn switch_phase_handler(
    State(state): State<AppState>,
    Path(phase): Path<String>,
) -> Response {
    let phase: Phase = match phase.parse() {
        Ok(phase) => phase,
        Err(e) => {
            warn!("Rejected phase switch: {}", e);
            return (StatusCode::BAD_REQUEST, e).into_response();
        }
    };
    info!("Phase switch endpoint called: {}", phase);
    respond(state.page.switch_phase(phase), "Phase switched").into_response()
}

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<AppState>) -> Json<TimerSettings> {
    state.page.reconcile();
    Json(state.page.settings())
}

/// Handle PUT /settings - Replace settings; invalid input leaves them untouched
///
/// Bodies that do not decode (negative or missing fields, bad JSON) are
/// rejected with 400 like any other invalid settings.
pub async fn put_settings_handler(
    State(state): State<AppState>,
    payload: Result<Json<TimerSettings>, JsonRejection>,
) -> Result<Json<TimerSettings>, TimerError> {
    let Json(settings) = payload.map_err(|rejection| {
        warn!("Settings body rejected: {}", rejection.body_text());
        TimerError::MalformedRequest(rejection.body_text())
    })?;

    match state.page.update_settings(settings) {
        Ok(settings) => Ok(Json(settings)),
        Err(e) => {
            warn!("Settings update rejected: {}", e);
            Err(e)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
