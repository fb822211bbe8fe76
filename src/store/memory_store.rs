//! In-memory store used for the test environment

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProjectStore;
use crate::{error::StoreError, state::ProjectRecord};

/// Process-local store with no side effects outside memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, ProjectRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn get(&self, project_name: &str) -> Result<Option<ProjectRecord>, StoreError> {
        Ok(self.records.read().await.get(project_name).cloned())
    }

    async fn put(&self, record: &ProjectRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.project_name.clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
