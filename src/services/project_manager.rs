//! Project record reads and read-modify-write updates

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    state::ProjectRecord,
    store::ProjectStore,
    utils::clock::Clock,
};

/// Seconds each project accrued today, plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodaySummary {
    pub date: String,
    /// `(project_name, seconds)` for projects with a bucket for today, by name.
    pub projects: Vec<(String, i64)>,
    pub total_seconds: i64,
}

type ProjectLocks = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

/// Held mutation guard for one project.
///
/// On release the project's entry leaves the lock map unless another task
/// is queued on it.
struct ProjectGuard<'a> {
    locks: &'a ProjectLocks,
    project_name: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProjectGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Release first so our own clone no longer counts
        drop(self.guard.take());
        if locks
            .get(&self.project_name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.project_name);
        }
    }
}

/// Owns every read-modify-write against project records.
///
/// Mutations of one project are serialized through a per-project guard so a
/// tick and an edit for the same project never overwrite each other.
pub struct ProjectManager {
    store: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
    locks: ProjectLocks,
}

impl ProjectManager {
    /// Create a manager over `store`, dating buckets with `clock`
    pub fn new(store: Arc<dyn ProjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Clock used for `last_time` and day buckets
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Acquire the mutation guard for one project
    async fn lock_project(&self, project_name: &str) -> ProjectGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(project_name.to_string()).or_default())
        };
        ProjectGuard {
            locks: &self.locks,
            project_name: project_name.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of projects with a held or awaited guard
    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Fetch the record for `project_name`, creating and persisting an empty one if needed
    pub async fn fetch_or_create(&self, project_name: &str) -> Result<ProjectRecord, StoreError> {
        let _guard = self.lock_project(project_name).await;
        self.fetch_or_create_locked(project_name).await
    }

    async fn fetch_or_create_locked(&self, project_name: &str) -> Result<ProjectRecord, StoreError> {
        if let Some(record) = self.store.get(project_name).await? {
            return Ok(record);
        }

        let record = ProjectRecord::new(project_name, self.clock.now());
        self.store.put(&record).await?;
        info!(project = %project_name, "Created project record");
        Ok(record)
    }

    /// Add `seconds` to the record's total and today's bucket, then persist it.
    ///
    /// Callers must hold the project's guard; use [`Self::accrue`] otherwise.
    pub async fn apply_delta(
        &self,
        mut record: ProjectRecord,
        seconds: i64,
    ) -> Result<ProjectRecord, StoreError> {
        let today = self.clock.today();
        record.add_time(seconds, &today, self.clock.now());
        self.store.put(&record).await?;
        Ok(record)
    }

    /// Count one more `start` request against the record and persist it
    pub async fn increment_call_count(
        &self,
        mut record: ProjectRecord,
    ) -> Result<ProjectRecord, StoreError> {
        record.times_called += 1;
        self.store.put(&record).await?;
        Ok(record)
    }

    /// Fetch-or-create then apply a delta, atomically with respect to the project
    pub async fn accrue(&self, project_name: &str, seconds: i64) -> Result<ProjectRecord, StoreError> {
        let _guard = self.lock_project(project_name).await;
        let record = self.fetch_or_create_locked(project_name).await?;
        let record = self.apply_delta(record, seconds).await?;
        debug!(
            project = %project_name,
            delta = seconds,
            total = %record.readable_time,
            "Accrued time"
        );
        Ok(record)
    }

    /// Fetch-or-create then bump `times_called`, atomically with respect to the project
    pub async fn register_call(&self, project_name: &str) -> Result<ProjectRecord, StoreError> {
        let _guard = self.lock_project(project_name).await;
        let record = self.fetch_or_create_locked(project_name).await?;
        self.increment_call_count(record).await
    }

    /// Every record, ordered by project name
    pub async fn list_all(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let mut records = self.store.list().await?;
        records.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        Ok(records)
    }

    /// Today's seconds per project and their sum; projects without a bucket are skipped
    pub async fn sum_today(&self) -> Result<TodaySummary, StoreError> {
        let date = self.clock.today();
        let projects: Vec<(String, i64)> = self
            .list_all()
            .await?
            .into_iter()
            .filter_map(|record| {
                record
                    .seconds_on(&date)
                    .map(|seconds| (record.project_name, seconds))
            })
            .collect();
        let total_seconds = projects.iter().map(|(_, seconds)| seconds).sum();

        Ok(TodaySummary {
            date,
            projects,
            total_seconds,
        })
    }

    /// Like [`Self::list_all`], but a failing store is logged and read as empty
    pub async fn list_all_or_empty(&self) -> Vec<ProjectRecord> {
        self.list_all().await.unwrap_or_else(|e| {
            warn!("Failed to list projects, treating store as empty: {}", e);
            Vec::new()
        })
    }

    /// Like [`Self::sum_today`], but a failing store is logged and read as empty
    pub async fn sum_today_or_empty(&self) -> TodaySummary {
        match self.sum_today().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Failed to sum today's times, treating store as empty: {}", e);
                TodaySummary {
                    date: self.clock.today(),
                    projects: Vec::new(),
                    total_seconds: 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        state::DayBucket,
        store::MemoryStore,
        utils::clock::ManualClock,
    };

    fn manager_at(clock: Arc<ManualClock>) -> ProjectManager {
        ProjectManager::new(Arc::new(MemoryStore::new()), clock)
    }

    fn noon() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
    }

    #[tokio::test]
    async fn fetch_or_create_persists_once() -> Result<()> {
        let manager = manager_at(noon());

        let created = manager.fetch_or_create("alpha").await?;
        assert_eq!(created.elapsed_time, 0);
        assert_eq!(created.times_called, 0);
        assert!(created.times_per_day.is_empty());

        let fetched = manager.fetch_or_create("alpha").await?;
        assert_eq!(fetched, created);
        assert_eq!(manager.list_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn edit_of_five_minutes_on_fresh_project() -> Result<()> {
        let manager = manager_at(noon());

        let record = manager.accrue("P", 5 * 60).await?;

        assert_eq!(record.elapsed_time, 300);
        assert_eq!(record.times_per_day, vec![DayBucket::new("2024-05-01", 300)]);
        assert_eq!(record.times_called, 0);
        Ok(())
    }

    #[tokio::test]
    async fn same_day_accruals_share_one_bucket() -> Result<()> {
        let manager = manager_at(noon());

        manager.accrue("P", 60).await?;
        let record = manager.accrue("P", 120).await?;

        assert_eq!(record.times_per_day, vec![DayBucket::new("2024-05-01", 180)]);
        Ok(())
    }

    #[tokio::test]
    async fn delta_lands_on_date_at_call_time() -> Result<()> {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap(),
        ));
        let manager = manager_at(Arc::clone(&clock));

        manager.accrue("P", 2).await?;
        clock.advance(chrono::Duration::seconds(2));
        let record = manager.accrue("P", 2).await?;

        assert_eq!(
            record.times_per_day,
            vec![DayBucket::new("2024-05-01", 2), DayBucket::new("2024-05-02", 2)]
        );
        assert_eq!(record.elapsed_time, record.bucket_total());
        Ok(())
    }

    #[tokio::test]
    async fn register_call_only_touches_counter() -> Result<()> {
        let manager = manager_at(noon());

        manager.register_call("P").await?;
        let record = manager.register_call("P").await?;

        assert_eq!(record.times_called, 2);
        assert_eq!(record.elapsed_time, 0);
        Ok(())
    }

    #[tokio::test]
    async fn list_all_sorts_by_name() -> Result<()> {
        let manager = manager_at(noon());
        for name in ["delta", "alpha", "charlie", "bravo"] {
            manager.fetch_or_create(name).await?;
        }

        let names: Vec<String> = manager
            .list_all()
            .await?
            .into_iter()
            .map(|r| r.project_name)
            .collect();
        assert_eq!(names, ["alpha", "bravo", "charlie", "delta"]);
        Ok(())
    }

    #[tokio::test]
    async fn sum_today_skips_projects_without_bucket() -> Result<()> {
        let clock = noon();
        let manager = manager_at(Arc::clone(&clock));

        manager.accrue("old", 500).await?;
        clock.advance(chrono::Duration::days(1));
        manager.accrue("b", 30).await?;
        manager.accrue("a", 90).await?;
        manager.fetch_or_create("idle").await?;

        let summary = manager.sum_today().await?;
        assert_eq!(summary.date, "2024-05-02");
        assert_eq!(
            summary.projects,
            vec![("a".to_string(), 90), ("b".to_string(), 30)]
        );
        assert_eq!(summary.total_seconds, 120);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_accruals_never_lose_updates() -> Result<()> {
        let manager = Arc::new(manager_at(noon()));

        let tasks: Vec<_> = (1..=50)
            .map(|delta| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.accrue("P", delta).await })
            })
            .collect();
        for task in tasks {
            task.await??;
        }

        let record = manager.fetch_or_create("P").await?;
        assert_eq!(record.elapsed_time, (1..=50).sum::<i64>());
        assert_eq!(record.elapsed_time, record.bucket_total());
        assert_eq!(manager.tracked_locks(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn released_guards_leave_no_lock_entries() -> Result<()> {
        let manager = manager_at(noon());
        for name in ["a", "b", "c"] {
            manager.accrue(name, 1).await?;
            manager.register_call(name).await?;
        }
        assert_eq!(manager.tracked_locks(), 0);

        let held = manager.lock_project("a").await;
        assert_eq!(manager.tracked_locks(), 1);
        drop(held);
        assert_eq!(manager.tracked_locks(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn very_large_edits_accrue_exactly() -> Result<()> {
        let manager = manager_at(noon());

        let record = manager.accrue("P", 3_000_000_000 * 60).await?;

        assert_eq!(record.elapsed_time, 180_000_000_000);
        assert_eq!(record.bucket_total(), 180_000_000_000);
        assert_eq!(record.readable_time.hours, 50_000_000);
        Ok(())
    }
}
