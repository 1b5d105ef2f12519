//! Error types for timer operations

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::api::responses::ErrorResponse;

/// Errors returned by timer commands
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("invalid preset: {minutes} minutes (must be at least 1)")]
    InvalidPreset { minutes: u32 },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("failed to lock timer state: {0}")]
    LockPoisoned(String),
}

impl TimerError {
    /// HTTP status matching this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TimerError::InvalidPreset { .. } | TimerError::UnknownPreset(_) => {
                StatusCode::BAD_REQUEST
            }
            TimerError::LockPoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
