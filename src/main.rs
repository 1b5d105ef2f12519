//! Pomodoro Clock - A countdown timer server
//!
//! This is the main entry point for the pomodoro-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_clock::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::display_renderer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, preset={}min",
          config.host, config.port, config.preset);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.preset));

    // Render the display as it changes
    let renderer_state = Arc::clone(&state);
    tokio::spawn(async move {
        display_renderer_task(renderer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start           - Start the countdown");
    info!("  POST /pause           - Pause the countdown");
    info!("  POST /reset           - Rewind to the current preset");
    info!("  POST /preset/:preset  - pomodoro, short-break, long-break or minutes");
    info!("  GET  /status          - Current timer and server status");
    info!("  GET  /events          - Display updates (server-sent events)");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    if let Err(e) = state.shutdown() {
        tracing::error!("Failed to stop timer: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
