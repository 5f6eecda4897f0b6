use serde::{Deserialize, Serialize};

use super::key::SessionKey;

/// One saved draft. Written whole by a flush; at most one per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub key: SessionKey,
    pub content: String,
}

/// In-memory session bookkeeping, owned by `SessionStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub dirty: bool,
    pub last_flushed_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoConflictReason {
    NoSavedEntry,
    BlankSavedEntry,
    MatchesStarter,
    /// Storage could not be read; the session runs in memory only.
    StorageUnavailable,
}

/// Outcome of `SessionStore::initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictDecision {
    NoConflict(NoConflictReason),
    /// A resumable draft exists but the user opted out of prompts. The starter
    /// content stays and the draft is left in storage.
    Suppressed,
    /// A resumable draft exists and the user should be asked.
    Offer { saved_content: String },
}

impl ConflictDecision {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Suppressed | Self::Offer { .. })
    }

    /// Short name for logs; never includes the draft itself.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoConflict(NoConflictReason::NoSavedEntry) => "no_saved_entry",
            Self::NoConflict(NoConflictReason::BlankSavedEntry) => "blank_saved_entry",
            Self::NoConflict(NoConflictReason::MatchesStarter) => "matches_starter",
            Self::NoConflict(NoConflictReason::StorageUnavailable) => "storage_unavailable",
            Self::Suppressed => "suppressed",
            Self::Offer { .. } => "offer",
        }
    }

    pub fn saved_content(&self) -> Option<&str> {
        match self {
            Self::Offer { saved_content } => Some(saved_content),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushResult {
    Written,
    /// Content matches the last flushed (or starter) content; nothing written.
    Unchanged,
    /// Blank content never replaces a saved draft.
    SkippedBlank,
    /// No session key yet: `initialize` has not run.
    NoSession,
    /// The write failed; the session continues in memory.
    StorageUnavailable,
}
