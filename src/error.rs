//! Error types shared across the store and the HTTP layer

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a [`crate::store::ProjectStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access project store at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("project store at {path} is not valid JSON")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize project records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Corrupt {
            path: path.into().display().to_string(),
            source,
        }
    }
}
