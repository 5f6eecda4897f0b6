//! Navigation guard for unsaved edits.
//!
//! Browsers show their own wording for the leave-page confirmation; the guard
//! only decides whether to ask at all.

use crate::notify::Notifier;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    Allow,
    /// Ask the browser for its native leave-page confirmation.
    Confirm,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnloadGuard;

impl UnloadGuard {
    pub fn new() -> Self {
        UnloadGuard
    }

    /// Checks the live editor content at the moment of unload, not a cached flag.
    pub fn on_before_unload<S: KeyValueStore, N: Notifier>(
        &self,
        session: &mut SessionStore<S, N>,
    ) -> UnloadDecision {
        session.mark_dirty();
        if session.is_dirty() {
            tracing::debug!("Unsaved changes at unload, requesting confirmation");
            UnloadDecision::Confirm
        } else {
            UnloadDecision::Allow
        }
    }
}
