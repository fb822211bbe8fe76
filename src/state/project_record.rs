//! Durable per-project record and its day buckets

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::services::formatter::{format_time, ReadableTime};

/// Seconds accrued on one calendar date.
///
/// Persisted as a single-key object, e.g. `{"2024-05-01": 120}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: String,
    pub seconds: i64,
}

impl DayBucket {
    pub fn new(date: impl Into<String>, seconds: i64) -> Self {
        Self {
            date: date.into(),
            seconds,
        }
    }
}

impl Serialize for DayBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(std::iter::once((&self.date, self.seconds)))
    }
}

impl<'de> Deserialize<'de> for DayBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entry = BTreeMap::<String, i64>::deserialize(deserializer)?;
        if entry.len() != 1 {
            return Err(de::Error::invalid_length(
                entry.len(),
                &"a single date to seconds entry",
            ));
        }
        let (date, seconds) = entry
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("empty day bucket"))?;
        Ok(Self { date, seconds })
    }
}

/// One project's accrued time, keyed by `project_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_name: String,
    /// Total accrued seconds; always the sum of `times_per_day`.
    pub elapsed_time: i64,
    /// Number of `start` requests ever issued for this project.
    pub times_called: u64,
    /// One bucket per date, in first-seen order.
    pub times_per_day: Vec<DayBucket>,
    pub last_time: DateTime<Utc>,
    /// Derived from `elapsed_time`; recomputed on every mutation.
    pub readable_time: ReadableTime,
}

impl ProjectRecord {
    /// Create an empty record stamped with `now`
    pub fn new(project_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            project_name: project_name.into(),
            elapsed_time: 0,
            times_called: 0,
            times_per_day: Vec::new(),
            last_time: now,
            readable_time: format_time(0),
        }
    }

    /// Add `seconds` to the total and to the bucket for `today`.
    ///
    /// The whole delta lands on `today`, it is never split across dates.
    pub fn add_time(&mut self, seconds: i64, today: &str, now: DateTime<Utc>) {
        self.elapsed_time = self.elapsed_time.saturating_add(seconds);
        self.last_time = now;
        self.readable_time = format_time(self.elapsed_time.max(0) as u64);

        match self.times_per_day.iter_mut().find(|bucket| bucket.date == today) {
            Some(bucket) => bucket.seconds = bucket.seconds.saturating_add(seconds),
            None => self.times_per_day.push(DayBucket::new(today, seconds)),
        }
    }

    /// Seconds recorded for `date`, if a bucket exists
    pub fn seconds_on(&self, date: &str) -> Option<i64> {
        self.times_per_day
            .iter()
            .find(|bucket| bucket.date == date)
            .map(|bucket| bucket.seconds)
    }

    /// Sum of every day bucket
    pub fn bucket_total(&self) -> i64 {
        self.times_per_day.iter().map(|bucket| bucket.seconds).sum()
    }
}
