//! Display renderer background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Background task that renders the timer display to the log
pub async fn display_renderer_task(state: Arc<AppState>) {
    info!("Starting display renderer task");

    let mut display_rx = state.subscribe();

    match state.snapshot() {
        Ok(initial) => info!("Timer {}", initial),
        Err(e) => error!("Failed to read initial timer state: {}", e),
    }

    loop {
        match display_rx.recv().await {
            Ok(update) if update.expired => {
                info!("Timer {} - time is up", update.display);
            }
            Ok(update) if update.running => {
                debug!("Timer {}", update.display);
            }
            Ok(update) => {
                info!("Timer {}", update.display);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display renderer skipped {} updates", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Display channel closed, stopping renderer");
                break;
            }
        }
    }
}
