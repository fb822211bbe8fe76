//! Wall-clock abstraction so day bucketing can be driven from tests

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

/// Source of the current time for accrual and day bucketing.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    /// Today's UTC calendar date in `YYYY-MM-DD` form.
    fn today(&self) -> String {
        self.now().date_naive().format("%Y-%m-%d").to_string()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
