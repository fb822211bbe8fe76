//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::{error, info};

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to register signal handler, falling back to Ctrl+C: {}", e);
            settle_ctrl_c(tokio::signal::ctrl_c().await).await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Resolve once Ctrl+C was received; never resolve if listening failed
async fn settle_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn failed_ctrl_c_listener_never_signals_shutdown() {
        let failed = std::io::Error::new(std::io::ErrorKind::Other, "no signal driver");
        let waited = tokio::time::timeout(Duration::from_secs(3600), settle_ctrl_c(Err(failed))).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn received_ctrl_c_signals_shutdown() {
        settle_ctrl_c(Ok(())).await;
    }
}
