//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{error::TimerError, tasks::spawn_tick_source};
use super::{DisplayUpdate, PresetSelection, TimerState};

/// The countdown together with the tick source currently driving it.
///
/// Every cancellation bumps `generation`, so a tick source that was already
/// woken when it got cancelled still sees it is stale once it takes the lock.
#[derive(Debug)]
pub(crate) struct TimerCore {
    pub(crate) state: TimerState,
    generation: u64,
    tick_source: Option<JoinHandle<()>>,
}

impl TimerCore {
    pub(crate) fn new(preset_minutes: u32) -> Self {
        Self {
            state: TimerState::new(preset_minutes),
            generation: 0,
            tick_source: None,
        }
    }

    /// Generation of the current tick source
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if the tick source for `generation` is still the live one
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.state.is_running()
    }

    /// Abort the tick source, if any. Returns `true` if one was running.
    fn cancel_tick_source(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.tick_source.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Check if a tick source task is attached and still alive
    fn has_live_tick_source(&self) -> bool {
        self.tick_source
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Forget the handle of a tick source that ended on its own
    pub(crate) fn release_tick_source(&mut self, generation: u64) {
        if self.generation == generation {
            self.tick_source = None;
        }
    }
}

/// Main application state: owns the timer and the server metadata
#[derive(Debug)]
pub struct AppState {
    /// Timer state and its tick source, behind one lock
    timer: Arc<Mutex<TimerCore>>,
    /// Channel for display updates
    display_tx: broadcast::Sender<DisplayUpdate>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with a stopped timer at the given preset
    pub fn new(port: u16, host: String, preset_minutes: u32) -> Self {
        let (display_tx, _) = broadcast::channel(100);

        Self {
            timer: Arc::new(Mutex::new(TimerCore::new(preset_minutes))),
            display_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, TimerCore>, TimerError> {
        self.timer
            .lock()
            .map_err(|e| TimerError::LockPoisoned(e.to_string()))
    }

    /// Start counting down. Calling it while a tick source runs changes nothing.
    pub fn start(&self) -> Result<TimerState, TimerError> {
        let mut core = self.lock_timer()?;

        if core.state.is_running() {
            if core.has_live_tick_source() {
                debug!("Timer already running at {}, ignoring start", core.state);
                return Ok(core.state);
            }
            warn!("Timer marked running at {} without a tick source, respawning", core.state);
        } else if !core.state.start() {
            info!("Timer is at {}, nothing to count down", core.state);
            return Ok(core.state);
        }

        // At most one tick source: drop whatever is left of an older one first
        core.cancel_tick_source();
        let generation = core.generation();
        core.tick_source = Some(spawn_tick_source(
            Arc::clone(&self.timer),
            self.display_tx.clone(),
            generation,
        ));

        let state = core.state;
        drop(core);

        info!("Timer started at {}", state);
        self.record_action("start");
        Ok(state)
    }

    /// Stop counting down. No tick lands after this returns.
    pub fn pause(&self) -> Result<TimerState, TimerError> {
        let mut core = self.lock_timer()?;
        core.cancel_tick_source();
        let was_running = core.state.pause();
        let state = core.state;
        drop(core);

        if was_running {
            info!("Timer paused at {}", state);
        } else {
            debug!("Timer already stopped at {}", state);
        }
        self.record_action("pause");
        Ok(state)
    }

    /// Stop and rewind to the start of the current preset
    pub fn reset(&self) -> Result<TimerState, TimerError> {
        let mut core = self.lock_timer()?;
        core.cancel_tick_source();
        core.state.reset();
        let state = core.state;
        self.emit(&state);
        drop(core);

        info!("Timer reset to {}", state);
        self.record_action("reset");
        Ok(state)
    }

    /// Switch to a preset duration, stopping the timer
    pub fn select_preset(&self, selection: PresetSelection) -> Result<TimerState, TimerError> {
        let mut core = self.lock_timer()?;
        // Validate before touching the tick source so a bad request leaves it running
        let mut next = core.state;
        next.select_preset(selection.minutes())?;

        core.cancel_tick_source();
        core.state = next;
        self.emit(&next);
        drop(core);

        info!("Preset {} selected, timer set to {}", selection.label(), next);
        self.record_action(&format!("preset:{}", selection.label()));
        Ok(next)
    }

    /// Cancel any running tick source ahead of process exit
    pub fn shutdown(&self) -> Result<(), TimerError> {
        let mut core = self.lock_timer()?;
        if core.cancel_tick_source() {
            core.state.pause();
            info!("Tick source cancelled at {}", core.state);
        }
        Ok(())
    }

    /// Get current timer state
    pub fn snapshot(&self) -> Result<TimerState, TimerError> {
        self.lock_timer().map(|core| core.state)
    }

    /// Subscribe to display updates
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayUpdate> {
        self.display_tx.subscribe()
    }

    fn emit(&self, state: &TimerState) {
        if self.display_tx.send(DisplayUpdate::from_state(state)).is_err() {
            debug!("No display observers for {}", state);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::state::Preset;

    fn test_state(preset_minutes: u32) -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), preset_minutes)
    }

    fn display(state: &AppState) -> String {
        state.snapshot().unwrap().to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        let state = test_state(25);
        state.start().unwrap();

        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(display(&state), "24:57");
        assert!(state.snapshot().unwrap().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_tick_source() {
        let state = test_state(25);
        state.start().unwrap();
        state.start().unwrap();

        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(display(&state), "24:57");

        state.start().unwrap();
        sleep(Duration::from_secs(2)).await;
        assert_eq!(display(&state), "24:55");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let state = test_state(25);
        state.start().unwrap();
        sleep(Duration::from_millis(2_500)).await;

        let paused = state.pause().unwrap();
        assert_eq!(paused.to_string(), "24:58");
        assert!(!paused.is_running());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(display(&state), "24:58");

        // resuming continues from where it stopped
        state.start().unwrap();
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(display(&state), "24:57");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_recovers_running_state_without_tick_source() {
        let state = test_state(25);
        state.timer.lock().unwrap().state.start();
        assert!(state.timer.lock().unwrap().tick_source.is_none());

        state.start().unwrap();
        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(display(&state), "24:55");
        assert!(state.snapshot().unwrap().is_running());

        // the respawned source is the only one
        state.start().unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(display(&state), "24:54");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_when_stopped_is_noop() {
        let state = test_state(25);
        let paused = state.pause().unwrap();
        assert_eq!(paused, TimerState::new(25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_after_ninety_seconds() {
        let state = test_state(25);
        state.start().unwrap();
        sleep(Duration::from_millis(90_500)).await;
        assert_eq!(display(&state), "23:30");

        let reset = state.reset().unwrap();
        assert_eq!((reset.minutes(), reset.seconds()), (25, 0));
        assert!(!reset.is_running());

        sleep(Duration::from_secs(5)).await;
        assert_eq!(display(&state), "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_preset_while_running() {
        let state = test_state(11);
        state.start().unwrap();
        sleep(Duration::from_millis(30_500)).await;
        assert_eq!(display(&state), "10:30");

        let selected = state.select_preset(Preset::ShortBreak.into()).unwrap();
        assert_eq!((selected.minutes(), selected.seconds()), (5, 0));
        assert_eq!(selected.preset_minutes(), 5);
        assert!(!selected.is_running());

        sleep(Duration::from_secs(5)).await;
        assert_eq!(display(&state), "5:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_preset_keeps_timer_running() {
        let state = test_state(25);
        state.start().unwrap();

        let err = state.select_preset(PresetSelection::Minutes(0)).unwrap_err();
        assert!(matches!(err, TimerError::InvalidPreset { minutes: 0 }));

        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(display(&state), "24:59");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_stops_tick_source() {
        let state = test_state(1);
        let mut rx = state.subscribe();
        state.start().unwrap();

        sleep(Duration::from_millis(60_500)).await;
        let expired = state.snapshot().unwrap();
        assert_eq!(expired.to_string(), "0:00");
        assert!(!expired.is_running());

        let mut last = None;
        let mut count = 0;
        while let Ok(update) = rx.try_recv() {
            count += 1;
            last = Some(update);
        }
        assert_eq!(count, 60);
        let last = last.unwrap();
        assert!(last.expired);
        assert!(!last.running);

        // the tick source is gone and a start at 0:00 does nothing
        assert!(state.timer.lock().unwrap().tick_source.is_none());
        state.start().unwrap();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(display(&state), "0:00");
        assert!(!state.snapshot().unwrap().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_updates_emitted() {
        let state = test_state(25);
        let mut rx = state.subscribe();

        state.start().unwrap();
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(rx.try_recv().unwrap().display, "24:59");
        assert_eq!(rx.try_recv().unwrap().display, "24:58");

        // pause does not change the displayed time
        state.pause().unwrap();
        assert!(rx.try_recv().is_err());

        state.reset().unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.display, "25:00");
        assert!(!update.running);

        state.select_preset(Preset::LongBreak.into()).unwrap();
        assert_eq!(rx.try_recv().unwrap().display, "10:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_tick_source() {
        let state = test_state(25);
        state.start().unwrap();
        state.shutdown().unwrap();

        sleep(Duration::from_secs(3)).await;
        assert_eq!(display(&state), "25:00");
        assert!(!state.snapshot().unwrap().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_action_recorded() {
        let state = test_state(25);
        assert_eq!(state.get_last_action(), (None, None));

        state.select_preset(PresetSelection::Minutes(45)).unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("preset:45min"));
        assert!(time.is_some());
    }
}
