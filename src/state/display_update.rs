//! Display notification sent to timer observers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerState;

/// Emitted after every change to the displayed time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    pub minutes: u32,
    pub seconds: u32,
    /// Rendered `m:ss` string
    pub display: String,
    pub running: bool,
    pub expired: bool,
    pub timestamp: DateTime<Utc>,
}

impl DisplayUpdate {
    pub fn from_state(state: &TimerState) -> Self {
        Self {
            minutes: state.minutes(),
            seconds: state.seconds(),
            display: state.to_string(),
            running: state.is_running(),
            expired: state.is_expired(),
            timestamp: Utc::now(),
        }
    }
}
