//! The non-blocking "resume your saved code?" prompt.
//!
//! ```text
//! Hidden ──present(Offer)──▶ Visible ──resume──────────▶ Dismissed(Resumed)
//!                                    ──start_fresh─────▶ Dismissed(StartedFresh)
//!                                    ──never_ask_again─▶ Dismissed(NeverAskAgain)
//! ```
//!
//! Every action is terminal. Once dismissed, further actions are no-ops and
//! return `None`. A page shows at most one prompt in its lifetime, even if
//! the session is initialized again.

use crate::notify::Notifier;
use crate::session::{ConflictDecision, FlushResult, SessionStore};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Resumed,
    /// Starter content kept; the saved draft stays in storage.
    StartedFresh,
    NeverAskAgain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptState {
    Hidden,
    Visible { saved_content: String },
    Dismissed(PromptOutcome),
}

#[derive(Debug)]
pub struct ResumePromptController {
    state: PromptState,
    presented: bool,
}

impl Default for ResumePromptController {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumePromptController {
    pub fn new() -> Self {
        Self {
            state: PromptState::Hidden,
            presented: false,
        }
    }

    /// Shows the prompt for an `Offer` decision. Returns whether a prompt was
    /// shown by this call.
    pub fn present(&mut self, decision: &ConflictDecision) -> bool {
        let Some(saved_content) = decision.saved_content() else {
            return false;
        };
        if self.presented {
            tracing::debug!("Resume prompt already shown on this page, not stacking another");
            return false;
        }

        self.presented = true;
        self.state = PromptState::Visible {
            saved_content: saved_content.to_string(),
        };
        true
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, PromptState::Visible { .. })
    }

    pub fn outcome(&self) -> Option<PromptOutcome> {
        match self.state {
            PromptState::Dismissed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Replaces the editor content with the saved draft.
    pub fn resume<S: KeyValueStore, N: Notifier>(
        &mut self,
        session: &mut SessionStore<S, N>,
    ) -> Option<PromptOutcome> {
        let saved_content = self.dismiss(PromptOutcome::Resumed)?;
        let result = session.apply_resumed_content(&saved_content);
        if result != FlushResult::Written {
            tracing::debug!(result = ?result, "Resumed draft was not written back");
        }
        Some(PromptOutcome::Resumed)
    }

    /// Keeps the starter content. The saved draft is not deleted.
    pub fn start_fresh(&mut self) -> Option<PromptOutcome> {
        self.dismiss(PromptOutcome::StartedFresh)?;
        Some(PromptOutcome::StartedFresh)
    }

    /// Disables prompts for every session and confirms to the user.
    pub fn never_ask_again<S: KeyValueStore, N: Notifier>(
        &mut self,
        session: &mut SessionStore<S, N>,
    ) -> Option<PromptOutcome> {
        self.dismiss(PromptOutcome::NeverAskAgain)?;
        session.disable_resume_prompts();
        Some(PromptOutcome::NeverAskAgain)
    }

    fn dismiss(&mut self, outcome: PromptOutcome) -> Option<String> {
        if !self.is_visible() {
            return None;
        }
        match std::mem::replace(&mut self.state, PromptState::Dismissed(outcome)) {
            PromptState::Visible { saved_content } => {
                tracing::info!(outcome = ?outcome, "Resume prompt dismissed");
                Some(saved_content)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::PlainTextAdapter;
    use crate::config::SessionConfig;
    use crate::notify::{RecordingNotifier, Severity};
    use crate::session::{NoConflictReason, SessionKey};
    use crate::storage::MemoryStore;

    fn offered_session() -> (
        SessionStore<MemoryStore, RecordingNotifier>,
        ConflictDecision,
    ) {
        let mut storage = MemoryStore::new();
        storage.set("code_/c/1", "print('hi')").unwrap();
        let mut session = SessionStore::new(
            Box::new(PlainTextAdapter::new("pass")),
            storage,
            RecordingNotifier::new(),
            &SessionConfig::default(),
        );
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        (session, decision)
    }

    #[test]
    fn test_no_conflict_shows_nothing() {
        let mut prompt = ResumePromptController::new();
        let shown = prompt.present(&ConflictDecision::NoConflict(
            NoConflictReason::MatchesStarter,
        ));
        assert!(!shown);
        assert!(!prompt.is_visible());
    }

    #[test]
    fn test_suppressed_shows_nothing() {
        let mut prompt = ResumePromptController::new();
        assert!(!prompt.present(&ConflictDecision::Suppressed));
    }

    #[test]
    fn test_resume_applies_saved_content() {
        let (mut session, decision) = offered_session();
        let mut prompt = ResumePromptController::new();
        assert!(prompt.present(&decision));

        assert_eq!(prompt.resume(&mut session), Some(PromptOutcome::Resumed));
        assert_eq!(session.content(), "print('hi')");
        assert!(!session.is_dirty());
        assert!(!prompt.is_visible());
    }

    #[test]
    fn test_resume_applies_content_even_when_write_back_fails() {
        let mut session = SessionStore::new(
            Box::new(PlainTextAdapter::new("pass")),
            MemoryStore::unavailable(),
            RecordingNotifier::new(),
            &SessionConfig::default(),
        );
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        let mut prompt = ResumePromptController::new();
        prompt.present(&ConflictDecision::Offer {
            saved_content: "print('hi')".to_string(),
        });

        assert_eq!(prompt.resume(&mut session), Some(PromptOutcome::Resumed));
        assert_eq!(session.content(), "print('hi')");
        // Not persisted, so unload still has something to protect.
        assert!(session.is_dirty());
    }

    #[test]
    fn test_start_fresh_keeps_starter_and_saved_entry() {
        let (mut session, decision) = offered_session();
        let mut prompt = ResumePromptController::new();
        prompt.present(&decision);

        assert_eq!(prompt.start_fresh(), Some(PromptOutcome::StartedFresh));
        assert_eq!(session.content(), "pass");
        assert_eq!(session.saved_entry().unwrap().content, "print('hi')");
        // The periodic flush must not clobber the kept draft while untouched.
        session.flush_now();
        assert_eq!(session.saved_entry().unwrap().content, "print('hi')");
    }

    #[test]
    fn test_never_ask_again_disables_and_confirms() {
        let (mut session, decision) = offered_session();
        let mut prompt = ResumePromptController::new();
        prompt.present(&decision);

        assert_eq!(
            prompt.never_ask_again(&mut session),
            Some(PromptOutcome::NeverAskAgain)
        );
        assert!(session.resume_prompts_disabled());
        assert_eq!(session.content(), "pass");
        assert_eq!(
            session.notifier().last().unwrap().severity,
            Severity::Success
        );
    }

    #[test]
    fn test_actions_after_dismissal_are_noops() {
        let (mut session, decision) = offered_session();
        let mut prompt = ResumePromptController::new();
        prompt.present(&decision);
        prompt.start_fresh();

        assert_eq!(prompt.resume(&mut session), None);
        assert_eq!(prompt.never_ask_again(&mut session), None);
        assert_eq!(prompt.start_fresh(), None);
        assert_eq!(prompt.outcome(), Some(PromptOutcome::StartedFresh));
        assert_eq!(session.content(), "pass");
        assert!(session.notifier().history().is_empty());
    }

    #[test]
    fn test_second_present_does_not_stack() {
        let (mut session, decision) = offered_session();
        let mut prompt = ResumePromptController::new();
        assert!(prompt.present(&decision));

        let again = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert!(!prompt.present(&again));

        prompt.start_fresh();
        assert!(!prompt.present(&again));
        assert!(!prompt.is_visible());
    }
}
