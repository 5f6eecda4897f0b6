use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::{StorageError, StorageResult};

/// In-memory key-value store.
///
/// `with_quota` bounds the total bytes of keys plus values, like a browser's
/// per-origin storage limit. `unavailable` refuses every operation.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: None,
            available: true,
        }
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::unavailable("storage is disabled"))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.check_available()?;

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

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}
