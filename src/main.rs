//! Project Timer - an HTTP service that accrues per-project working time
//!
//! This is the main entry point for the project-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use project_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    store::open_store,
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("project_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting project-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, store={}, environment={:?}, interval={}s",
        config.host,
        config.port,
        config.store_path.display(),
        config.environment,
        config.interval
    );

    // An unreachable store is fatal at boot
    let store = open_store(&config).await?;

    let state = Arc::new(AppState::new(
        store,
        Arc::new(SystemClock),
        config.tick_interval(),
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET /start?project=<name>              - Start a project timer");
    info!("  GET /stop[?project=<name>]             - Stop one timer, or all timers");
    info!("  GET /edit?project=<name>&minutes=<n>   - Add or subtract minutes");
    info!("  GET /list                              - Log totals per project");
    info!("  GET /list-today                        - Log today's time per project");
    info!("  GET /status                            - Running timers and uptime");
    info!("  GET /health                            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.registry.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
