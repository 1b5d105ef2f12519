//! State management module
//!
//! This module contains the countdown state machine and the application
//! state that owns it.

pub mod app_state;
pub mod display_update;
pub mod preset;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub(crate) use app_state::TimerCore;
pub use display_update::DisplayUpdate;
pub use preset::{Preset, PresetSelection};
pub use timer_state::{TickOutcome, TimerState, DEFAULT_PRESET_MINUTES};
