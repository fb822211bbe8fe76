//! Registry of running project timers

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::accrual_tick_task;
use crate::{
    error::StoreError,
    services::ProjectManager,
    state::{ActiveTimer, ProjectRecord, TimerHandle},
};

/// Result of a `start` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new accrual loop was spawned
    Started,
    /// The project already had a loop; only the call count moved
    AlreadyRunning,
}

/// Owns one accrual loop per running project.
///
/// A project is either stopped (no handle) or running (exactly one handle
/// and one loop).
pub struct TimerRegistry {
    manager: Arc<ProjectManager>,
    interval: Duration,
    timers: Mutex<HashMap<String, TimerHandle>>,
}

impl TimerRegistry {
    /// Create an empty registry whose loops tick every `interval`
    pub fn new(manager: Arc<ProjectManager>, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Record manager the loops accrue through
    pub fn manager(&self) -> &Arc<ProjectManager> {
        &self.manager
    }

    /// Tick period, also the seconds accrued per tick
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<String, TimerHandle>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a start for `project_name` and spawn its accrual loop unless one is running.
    ///
    /// Every call bumps `times_called`, including calls on a running project.
    pub async fn start(&self, project_name: &str) -> Result<StartOutcome, StoreError> {
        let record = self.manager.register_call(project_name).await?;

        let mut timers = self.timers();
        if timers.contains_key(project_name) {
            info!(
                project = %project_name,
                times_called = record.times_called,
                "Timer already running"
            );
            return Ok(StartOutcome::AlreadyRunning);
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(accrual_tick_task(
            Arc::clone(&self.manager),
            project_name.to_string(),
            self.interval,
            cancel_rx,
        ));
        let started_at = self.manager.clock().now();
        timers.insert(
            project_name.to_string(),
            TimerHandle::new(project_name.to_string(), started_at, cancel_tx, task),
        );

        info!(
            project = %project_name,
            times_called = record.times_called,
            "Timer started at {}",
            started_at.format("%H:%M:%S")
        );
        Ok(StartOutcome::Started)
    }

    /// Cancel the loop for `project_name`. Returns `false` when nothing was running.
    pub fn stop(&self, project_name: &str) -> bool {
        let handle = self.timers().remove(project_name);
        match handle {
            Some(handle) => {
                handle.cancel();
                info!(project = %project_name, "Timer stopped");
                true
            }
            None => {
                debug!(project = %project_name, "No active timer to stop");
                false
            }
        }
    }

    /// Cancel every running loop, returning how many were stopped
    pub fn stop_all(&self) -> usize {
        let handles: Vec<TimerHandle> = self.timers().drain().map(|(_, h)| h).collect();
        let count = handles.len();
        for handle in handles {
            handle.cancel();
        }
        info!("Stopped all timers ({} active)", count);
        count
    }

    /// Cancel every loop and wait for in-flight ticks to finish writing
    pub async fn shutdown(&self) {
        let handles: Vec<TimerHandle> = self.timers().drain().map(|(_, h)| h).collect();
        let tasks: Vec<_> = handles.into_iter().map(TimerHandle::cancel).collect();
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                warn!("Accrual loop ended abnormally: {}", e);
            }
        }
        info!("Timer registry shut down");
    }

    /// Add `minutes` (possibly negative) to a project regardless of its timer state
    pub async fn edit_time(
        &self,
        project_name: &str,
        minutes: i64,
    ) -> Result<ProjectRecord, StoreError> {
        let record = self.manager.accrue(project_name, minutes.saturating_mul(60)).await?;
        info!("Edited time for {}: {}", project_name, record.readable_time);
        Ok(record)
    }

    /// Whether `project_name` currently has an accrual loop
    pub fn is_running(&self, project_name: &str) -> bool {
        self.timers().contains_key(project_name)
    }

    /// Running timers ordered by project name
    pub fn active_timers(&self) -> Vec<ActiveTimer> {
        let mut active: Vec<ActiveTimer> = self.timers().values().map(TimerHandle::snapshot).collect();
        active.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        active
    }
}
