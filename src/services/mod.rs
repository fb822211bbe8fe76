//! Accrual services module
//!
//! This module contains the time formatter and the project record manager
//! that owns every read-modify-write against the store.

pub mod formatter;
pub mod project_manager;

// Re-export main types
pub use formatter::{format_time, ReadableTime};
pub use project_manager::{ProjectManager, TodaySummary};
