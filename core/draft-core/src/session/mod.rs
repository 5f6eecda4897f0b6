//! Session persistence: dirty tracking, flushing, and the resume decision.
//!
//! # Conflict decision
//!
//! Evaluated once per [`SessionStore::initialize`], first match wins:
//!
//! ```text
//! no saved entry, or saved entry blank    → no conflict (starter stays)
//! saved entry == starter                  → no conflict (nothing to resume)
//! saved entry differs, prompts disabled   → suppressed  (starter stays, entry kept)
//! saved entry differs                     → offer       (prompt the user)
//! ```
//!
//! # Dirty tracking
//!
//! `dirty` is always `content != baseline`, where the baseline is the last
//! flushed content, or the starter content before any flush.
//!
//! # Module Structure
//!
//! - [`key`]: session key and storage key scheme
//! - [`preference`]: the global "never ask again" flag
//! - [`store`]: [`SessionStore`]
//! - [`types`]: decision, flush result, in-memory state

mod key;
mod preference;
mod store;
mod types;

pub use key::SessionKey;
pub use preference::ResumePreference;
pub use store::SessionStore;
pub use types::{ConflictDecision, FlushResult, NoConflictReason, PersistedEntry, SessionState};

/// True for empty or whitespace-only content, which is never saved or resumed.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}
