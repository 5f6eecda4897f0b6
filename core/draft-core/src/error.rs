use std::path::PathBuf;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures of the persisted key-value store.
///
/// The session layer treats every variant as "storage unavailable": editing
/// keeps working, nothing survives a reload.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("storage quota exceeded writing '{key}': need {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize drafts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist temp file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl StorageError {
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
