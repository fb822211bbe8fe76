//! Periodic accrual loop for one running project timer

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::oneshot,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::services::ProjectManager;

/// Accrue `period` seconds to `project_name` every `period` until cancelled.
///
/// The cancel signal is only observed between ticks, so an accrual that has
/// already started always finishes its write. Dropping the sender also stops
/// the loop.
pub async fn accrual_tick_task(
    manager: Arc<ProjectManager>,
    project_name: String,
    period: Duration,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    info!(project = %project_name, "Starting accrual loop every {}s", period.as_secs());

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let seconds = period.as_secs() as i64;

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                debug!(project = %project_name, "Accrual loop cancelled");
                break;
            }
            _ = interval.tick() => {}
        }

        match manager.accrue(&project_name, seconds).await {
            Ok(record) => {
                info!("Updated time for {}: {}", project_name, record.readable_time);
            }
            Err(e) => {
                error!(project = %project_name, "Failed to accrue tick: {}", e);
            }
        }
    }
}
