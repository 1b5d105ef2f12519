//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Preset, TimerState};

/// Serializable view of the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub preset_minutes: u32,
    /// Name of the preset when the duration matches one
    pub preset: Option<Preset>,
    pub minutes: u32,
    pub seconds: u32,
    pub running: bool,
    pub display: String,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            preset_minutes: state.preset_minutes(),
            preset: Preset::from_minutes(state.preset_minutes()),
            minutes: state.minutes(),
            seconds: state.seconds(),
            running: state.is_running(),
            display: state.to_string(),
        }
    }
}

/// API response structure for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a response describing the timer after a command
    pub fn new(message: String, state: TimerState) -> Self {
        let status = if state.is_running() { "running" } else { "stopped" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: state.into(),
        }
    }
}

/// Error body for rejected commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
