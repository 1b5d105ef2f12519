//! Timer state structure and management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Preset used when nothing else has been selected
pub const DEFAULT_PRESET_MINUTES: u32 = 25;

/// Result of applying one tick to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off the remaining time
    Decremented,
    /// Remaining time hit 0:00 and the timer stopped
    Expired,
    /// The timer was not running; nothing changed
    Ignored,
}

/// Countdown position plus the running flag.
///
/// Remaining seconds stay within `0..=59`; both counters are unsigned so the
/// remaining time can never go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    preset_minutes: u32,
    minutes: u32,
    seconds: u32,
    running: bool,
}

impl TimerState {
    /// Create a stopped timer positioned at the start of `preset_minutes`
    pub fn new(preset_minutes: u32) -> Self {
        Self {
            preset_minutes,
            minutes: preset_minutes,
            seconds: 0,
            running: false,
        }
    }

    /// Duration selected by the last preset, in minutes
    pub fn preset_minutes(&self) -> u32 {
        self.preset_minutes
    }

    /// Whole minutes left
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Seconds left within the current minute
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Check if no time is left
    pub fn is_expired(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// Begin counting down. Returns `true` if the timer was stopped and now runs.
    ///
    /// A timer sitting at 0:00 has nothing to count and stays stopped.
    pub fn start(&mut self) -> bool {
        if self.running || self.is_expired() {
            return false;
        }
        self.running = true;
        true
    }

    /// Stop counting down, keeping the remaining time. Returns `true` if it was running.
    pub fn pause(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        if self.is_expired() {
            self.running = false;
            return TickOutcome::Expired;
        }

        if self.seconds == 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            self.seconds -= 1;
        }

        if self.is_expired() {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Decremented
        }
    }

    /// Stop and rewind to the start of the current preset
    pub fn reset(&mut self) {
        self.running = false;
        self.minutes = self.preset_minutes;
        self.seconds = 0;
    }

    /// Switch to a new preset duration. Always leaves the timer stopped.
    pub fn select_preset(&mut self, minutes: u32) -> Result<(), TimerError> {
        if minutes == 0 {
            return Err(TimerError::InvalidPreset { minutes });
        }
        self.preset_minutes = minutes;
        self.reset();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn at(minutes: u32, seconds: u32, running: bool) -> Self {
        assert!(seconds <= 59);
        Self {
            preset_minutes: DEFAULT_PRESET_MINUTES,
            minutes,
            seconds,
            running,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_MINUTES)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}
