//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, DisplayUpdate, PresetSelection},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.start().map_err(|e| {
        error!("Failed to start timer: {}", e);
        e
    })?;

    let message = if timer.is_running() {
        "Timer running"
    } else {
        "Timer has no time left, select a preset or reset"
    };
    Ok(Json(ApiResponse::new(message.to_string(), timer)))
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.pause().map_err(|e| {
        error!("Failed to pause timer: {}", e);
        e
    })?;

    Ok(Json(ApiResponse::new("Timer paused".to_string(), timer)))
}

/// Handle POST /reset - Rewind to the current preset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.reset().map_err(|e| {
        error!("Failed to reset timer: {}", e);
        e
    })?;

    Ok(Json(ApiResponse::new("Timer reset".to_string(), timer)))
}

/// Handle POST /preset/:preset - Select a named preset or a custom number of minutes
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(preset): Path<String>,
) -> Result<Json<ApiResponse>, TimerError> {
    let selection: PresetSelection = preset.parse().map_err(|e| {
        warn!("Rejected preset request: {}", e);
        e
    })?;

    let timer = state.select_preset(selection).map_err(|e| {
        warn!("Failed to select preset {}: {}", preset, e);
        e
    })?;

    info!("Preset endpoint called - {} selected", selection.label());
    Ok(Json(ApiResponse::new(
        format!("Preset {} selected", selection.label()),
        timer,
    )))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, TimerError> {
    let timer = state.snapshot().map_err(|e| {
        error!("Failed to get timer state: {}", e);
        e
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: timer.into(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream display updates, starting with the current display
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, TimerError> {
    // Subscribe first so nothing between the snapshot and the stream is lost
    let display_rx = state.subscribe();
    let initial = DisplayUpdate::from_state(&state.snapshot()?);

    let first = stream::once(async move { Event::default().event("display").json_data(initial) });
    let updates = stream::unfold(display_rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    return Some((Event::default().event("display").json_data(update), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream skipped {} display updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(first.chain(updates)).keep_alive(KeepAlive::default()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
