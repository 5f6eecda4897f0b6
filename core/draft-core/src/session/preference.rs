use crate::config::DEFAULT_RESUME_PREFERENCE_KEY;
use crate::error::StorageResult;
use crate::storage::KeyValueStore;

const DISABLED: &str = "true";

/// Durable, global "don't ask me to resume" flag.
///
/// Not scoped to a session: once disabled, no page shows a resume prompt
/// until [`clear`](Self::clear) is called from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePreference {
    key: String,
}

impl ResumePreference {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn is_disabled<S: KeyValueStore + ?Sized>(&self, storage: &S) -> StorageResult<bool> {
        Ok(storage.get(&self.key)?.as_deref() == Some(DISABLED))
    }

    pub fn disable<S: KeyValueStore + ?Sized>(&self, storage: &mut S) -> StorageResult<()> {
        storage.set(&self.key, DISABLED)
    }

    pub fn clear<S: KeyValueStore + ?Sized>(&self, storage: &mut S) -> StorageResult<()> {
        storage.remove(&self.key)
    }
}

impl Default for ResumePreference {
    fn default() -> Self {
        Self::new(DEFAULT_RESUME_PREFERENCE_KEY)
    }
}
