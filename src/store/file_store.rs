//! Whole-file JSON store
//!
//! The file holds a JSON array of project records. Every operation reads the
//! full file and every write replaces it, so file access is serialized
//! through one lock regardless of which project is touched.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use super::ProjectStore;
use crate::{error::StoreError, state::ProjectRecord};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating an empty file when none exists.
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        };

        match fs::metadata(&store.path).await {
            Ok(_) => {
                let records = store.read_all().await?;
                info!("Loaded {} project records from {}", records.len(), store.path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StoreError::from_io(parent, e))?;
                }
                store.write_all(&[]).await?;
                info!("Created empty project store at {}", store.path.display());
            }
            Err(e) => return Err(StoreError::from_io(&store.path, e)),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::from_io(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(&self.path, e))
    }

    async fn write_all(&self, records: &[ProjectRecord]) -> Result<(), StoreError> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer)?;

        // Write next to the target and rename so readers never see a partial file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &buffer)
            .await
            .map_err(|e| StoreError::from_io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::from_io(&self.path, e))?;

        debug!("Wrote {} project records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn get(&self, project_name: &str) -> Result<Option<ProjectRecord>, StoreError> {
        let _guard = self.io_lock.lock().await;
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.project_name == project_name))
    }

    async fn put(&self, record: &ProjectRecord) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.read_all().await?;
        match records.iter_mut().find(|r| r.project_name == record.project_name) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records).await
    }

    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let _guard = self.io_lock.lock().await;
        self.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn creates_empty_array_when_missing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("times.json");

        let store = JsonFileStore::open(&path).await?;

        assert_eq!(std::fs::read_to_string(&path)?.trim(), "[]");
        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn put_replaces_existing_record() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::open(dir.path().join("times.json")).await?;

        let mut record = ProjectRecord::new("alpha", Utc::now());
        store.put(&record).await?;
        store.put(&ProjectRecord::new("beta", Utc::now())).await?;

        record.add_time(42, "2024-05-01", Utc::now());
        store.put(&record).await?;

        let records = store.list().await?;
        assert_eq!(records.len(), 2);
        assert_eq!(store.get("alpha").await?, Some(record));
        assert!(store.get("gamma").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn reopens_existing_file_with_four_space_indent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("times.json");
        {
            let store = JsonFileStore::open(&path).await?;
            store.put(&ProjectRecord::new("alpha", Utc::now())).await?;
        }

        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.contains("\n    {"));

        let store = JsonFileStore::open(&path).await?;
        assert_eq!(store.list().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("times.json");
        std::fs::write(&path, "{ not json")?;

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        Ok(())
    }
}
