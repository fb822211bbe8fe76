//! State management module
//!
//! This module contains the project record model, running timer handles and
//! the shared application state handed to the HTTP handlers.

pub mod app_state;
pub mod project_record;
pub mod timer_handle;

// Re-export main types
pub use app_state::AppState;
pub use project_record::{DayBucket, ProjectRecord};
pub use timer_handle::{ActiveTimer, TimerHandle};
