//! Project Timer - an HTTP service that accrues per-project working time
//!
//! Clients start and stop named timers; while a timer runs its project
//! accrues elapsed seconds into a durable record, bucketed per calendar day.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::StoreError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
