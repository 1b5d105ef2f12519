//! Pomodoro Clock - A countdown timer server
//!
//! This library provides a start/pause/reset countdown timer with pomodoro
//! presets, driven by a single cancellable one-second tick source and exposed
//! over HTTP.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, Preset, PresetSelection, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
