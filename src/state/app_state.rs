//! Main application state shared with the HTTP handlers

use std::{sync::Arc, time::Instant};

use crate::{
    services::{format_time, ProjectManager},
    store::ProjectStore,
    tasks::TimerRegistry,
    utils::clock::Clock,
};

/// Everything a request handler needs: the record manager, the timer
/// registry and some server metadata.
pub struct AppState {
    pub manager: Arc<ProjectManager>,
    pub registry: TimerRegistry,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Wire a manager and registry around the given store and clock
    pub fn new(
        store: Arc<dyn ProjectStore>,
        clock: Arc<dyn Clock>,
        interval: std::time::Duration,
        port: u16,
        host: String,
    ) -> Self {
        let manager = Arc::new(ProjectManager::new(store, clock));
        let registry = TimerRegistry::new(Arc::clone(&manager), interval);

        Self {
            manager,
            registry,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let uptime = format_time(self.start_time.elapsed().as_secs());

        if uptime.hours > 0 {
            format!("{}h {}m {}s", uptime.hours, uptime.minutes, uptime.seconds)
        } else if uptime.minutes > 0 {
            format!("{}m {}s", uptime.minutes, uptime.seconds)
        } else {
            format!("{}s", uptime.seconds)
        }
    }
}
