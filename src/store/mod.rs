//! Durable project record storage
//!
//! Records are addressed by project name and always read and written whole.
//! Backends only differ in where the records live; accrual logic never
//! depends on which one is in use.

pub mod file_store;
pub mod memory_store;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    config::{Config, Environment},
    error::StoreError,
    state::ProjectRecord,
};

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Key-value store of project records keyed by `project_name`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch one record by project name.
    async fn get(&self, project_name: &str) -> Result<Option<ProjectRecord>, StoreError>;

    /// Insert or replace the record with the same project name.
    async fn put(&self, record: &ProjectRecord) -> Result<(), StoreError>;

    /// Every stored record, in no particular order.
    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError>;
}

/// Open the store selected by the configuration
pub async fn open_store(config: &Config) -> Result<Arc<dyn ProjectStore>, StoreError> {
    match config.environment {
        Environment::Test => {
            info!("Test environment, using in-memory project store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Environment::Development | Environment::Production => {
            info!("Using JSON project store at {}", config.store_path.display());
            Ok(Arc::new(JsonFileStore::open(&config.store_path).await?))
        }
    }
}
