//! Background tasks module
//!
//! This module contains the per-project accrual loops and the registry that
//! owns them.

pub mod accrual_tick;
pub mod timer_registry;

// Re-export main types
pub use accrual_tick::accrual_tick_task;
pub use timer_registry::{StartOutcome, TimerRegistry};
