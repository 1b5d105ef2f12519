//! One-second tick source driving the countdown

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{DisplayUpdate, TickOutcome, TimerCore};

/// Period between two ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawn the background task that ticks the timer once per second.
///
/// The task stops on its own once the countdown expires, or at the next tick
/// after `generation` stops being the current one.
pub(crate) fn spawn_tick_source(
    timer: Arc<Mutex<TimerCore>>,
    display_tx: broadcast::Sender<DisplayUpdate>,
    generation: u64,
) -> JoinHandle<()> {
    let first_tick = Instant::now() + TICK_PERIOD;

    tokio::spawn(async move {
        debug!("Tick source {} started", generation);

        let mut interval = interval_at(first_tick, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let mut core = match timer.lock() {
                Ok(core) => core,
                Err(e) => {
                    error!("Failed to lock timer state: {}", e);
                    break;
                }
            };

            if !core.is_current(generation) {
                debug!("Tick source {} is stale, stopping", generation);
                break;
            }

            let outcome = core.state.tick();
            // Sent under the lock so observers see ticks and resets in order
            if display_tx.send(DisplayUpdate::from_state(&core.state)).is_err() {
                debug!("No display observers for {}", core.state);
            }

            if outcome == TickOutcome::Expired {
                core.release_tick_source(generation);
                info!("Timer expired");
                break;
            }
        }
    })
}
