//! File-backed draft persistence.
//!
//! Stores drafts in `~/.pyquest/drafts.json`.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "code_/challenges/3": { "value": "print('hi')", "updated_at": "..." },
//!     "disable_auto_resume_prompt": { "value": "true", "updated_at": "..." }
//!   }
//! }
//! ```
//!
//! # Defensive Loading
//!
//! - Missing or empty files return an empty store
//! - Corrupt JSON returns an empty store (logged)
//! - Unsupported versions return an empty store (logged)
//!
//! # Atomic Writes
//!
//! Every `set`/`remove` rewrites the whole file via temp file + rename, so a
//! reader never observes a half-written draft.

use fs_err as fs;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};

const FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DraftsFile {
    version: u32,
    entries: BTreeMap<String, StoredValue>,
}

pub struct FileStore {
    entries: BTreeMap<String, StoredValue>,
    file_path: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    pub fn new(file_path: &Path) -> Self {
        FileStore {
            entries: BTreeMap::new(),
            file_path: file_path.to_path_buf(),
            quota: None,
        }
    }

    pub fn load(file_path: &Path) -> StorageResult<Self> {
        if !file_path.exists() {
            return Ok(FileStore::new(file_path));
        }

        let content = fs::read_to_string(file_path)
            .map_err(|e| StorageError::io("reading drafts file", file_path, e))?;

        if content.trim().is_empty() {
            tracing::warn!(path = %file_path.display(), "Empty drafts file, starting empty");
            return Ok(FileStore::new(file_path));
        }

        match serde_json::from_str::<DraftsFile>(&content) {
            Ok(file) if file.version == FILE_VERSION => Ok(FileStore {
                entries: file.entries,
                file_path: file_path.to_path_buf(),
                quota: None,
            }),
            Ok(file) => {
                tracing::warn!(
                    version = file.version,
                    expected = FILE_VERSION,
                    "Unsupported drafts file version, starting empty"
                );
                Ok(FileStore::new(file_path))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse drafts file, starting empty");
                Ok(FileStore::new(file_path))
            }
        }
    }

    #[must_use]
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// All stored entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StoredValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn save(&self, entries: &BTreeMap<String, StoredValue>) -> StorageResult<()> {
        let file = DraftsFile {
            version: FILE_VERSION,
            entries: entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let parent_dir = self
            .file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)
            .map_err(|e| StorageError::io("creating drafts directory", parent_dir, e))?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| StorageError::io("creating temp drafts file", parent_dir, e))?;
        let temp_path = temp_file.path().to_path_buf();
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| StorageError::io("writing temp drafts file", &temp_path, e))?;
        temp_file
            .flush()
            .map_err(|e| StorageError::io("flushing temp drafts file", &temp_path, e))?;
        temp_file.persist(&self.file_path)?;

        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.value.len())
            .sum()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        // Disk first: the in-memory view only changes once the write landed.
        let mut next = self.entries.clone();
        next.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.save(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }

        let mut next = self.entries.clone();
        next.remove(key);
        self.save(&next)?;
        self.entries = next;
        Ok(())
    }
}
