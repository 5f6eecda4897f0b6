//! Draft persistence for the exercise editor page.
//!
//! Keeps in-progress code alive across page reloads and offers to resume it.
//!
//! ```text
//! page load → SessionStore::initialize → ResumePromptController (on conflict)
//!     user input → EditorAdapter + SessionStore::mark_dirty
//!     every 30s  → FlushScheduler → SessionStore::flush_now
//!     unload     → UnloadGuard (live dirty flag)
//! ```
//!
//! Everything runs on one execution context. Nothing here blocks, spawns, or locks;
//! storage reads and writes are synchronous and local.
//!
//! # Module Structure
//!
//! - [`adapter`]: the mounted text widget, plain or rich
//! - [`session`]: session key, dirty tracking, flush, conflict decision, resume preference
//! - [`prompt`]: the three-action resume prompt
//! - [`unload`]: navigation guard
//! - [`scheduler`]: fixed-interval flush timer
//! - [`page`]: wires the above into one page lifetime
//! - [`storage`]: key-value backends (memory, JSON file)
//! - [`notify`]: user-visible notifications
//! - [`config`]: data directory and tunables

pub mod adapter;
pub mod config;
pub mod error;
pub mod notify;
pub mod page;
pub mod prompt;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod unload;

pub use adapter::{mount, EditorAdapter, EditorKind, PlainTextAdapter, RichEditorAdapter};
pub use config::{SessionConfig, StorageConfig};
pub use error::StorageError;
pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use page::EditorPage;
pub use prompt::{PromptOutcome, ResumePromptController};
pub use scheduler::FlushScheduler;
pub use session::{
    ConflictDecision, FlushResult, NoConflictReason, PersistedEntry, ResumePreference,
    SessionKey, SessionState, SessionStore,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use unload::{UnloadDecision, UnloadGuard};
