//! Handle to one running project timer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{sync::oneshot, task::JoinHandle};

/// In-memory handle for a project whose accrual loop is running.
///
/// Never persisted; a restart forgets every running timer.
#[derive(Debug)]
pub struct TimerHandle {
    pub project_name: String,
    pub started_at: DateTime<Utc>,
    cancel_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn new(
        project_name: String,
        started_at: DateTime<Utc>,
        cancel_tx: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            project_name,
            started_at,
            cancel_tx,
            task,
        }
    }

    /// Prevent any further tick and hand back the loop's task.
    ///
    /// A tick already in progress still completes.
    pub fn cancel(self) -> JoinHandle<()> {
        // The loop may have exited on its own; nothing to signal then
        let _ = self.cancel_tx.send(());
        self.task
    }

    pub fn snapshot(&self) -> ActiveTimer {
        ActiveTimer {
            project_name: self.project_name.clone(),
            started_at: self.started_at,
        }
    }
}

/// Serializable view of a running timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub project_name: String,
    pub started_at: DateTime<Utc>,
}
