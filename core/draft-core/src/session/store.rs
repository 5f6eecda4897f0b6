//! Reconciles the editor's content with persisted storage.
//!
//! Storage failures never reach the caller. The first one is reported with a
//! single low-severity notification; after that the session keeps tracking
//! dirty state in memory and retries quietly on every flush.

use crate::adapter::EditorAdapter;
use crate::config::SessionConfig;
use crate::error::StorageError;
use crate::notify::{Notifier, Severity};
use crate::storage::KeyValueStore;

use super::is_blank;
use super::key::SessionKey;
use super::preference::ResumePreference;
use super::types::{
    ConflictDecision, FlushResult, NoConflictReason, PersistedEntry, SessionState,
};

pub const STORAGE_UNAVAILABLE_MESSAGE: &str =
    "Auto-save is unavailable; your code will not survive a reload.";
pub const PROMPTS_DISABLED_MESSAGE: &str =
    "Auto-resume prompts disabled. You can re-enable in Settings.";
pub const SAVED_MESSAGE: &str = "Code saved!";
pub const NOTHING_TO_SAVE_MESSAGE: &str = "Nothing to save yet.";

pub struct SessionStore<S, N> {
    adapter: Box<dyn EditorAdapter>,
    storage: S,
    notifier: N,
    preference: ResumePreference,
    content_key_prefix: String,
    key: Option<SessionKey>,
    starter: Option<String>,
    state: SessionState,
    storage_failure_reported: bool,
}

impl<S: KeyValueStore, N: Notifier> SessionStore<S, N> {
    pub fn new(
        adapter: Box<dyn EditorAdapter>,
        storage: S,
        notifier: N,
        config: &SessionConfig,
    ) -> Self {
        SessionStore {
            adapter,
            storage,
            notifier,
            preference: ResumePreference::new(config.resume_preference_key.clone()),
            content_key_prefix: config.content_key_prefix.clone(),
            key: None,
            starter: None,
            state: SessionState::default(),
            storage_failure_reported: false,
        }
    }

    /// Reads the saved draft for `key` and decides whether to offer it.
    ///
    /// The starter snapshot is captured on the first call only; a repeated
    /// call re-evaluates the decision against that same snapshot.
    pub fn initialize(&mut self, key: SessionKey, starter_content: String) -> ConflictDecision {
        let starter = self.starter.get_or_insert(starter_content).clone();
        let storage_key = key.storage_key(&self.content_key_prefix);
        self.key = Some(key);
        self.mark_dirty();

        let saved = match self.storage.get(&storage_key) {
            Ok(saved) => saved,
            Err(e) => {
                self.report_storage_failure("reading saved draft", &e);
                return ConflictDecision::NoConflict(NoConflictReason::StorageUnavailable);
            }
        };

        let decision = match saved {
            None => ConflictDecision::NoConflict(NoConflictReason::NoSavedEntry),
            Some(saved) if is_blank(&saved) => {
                ConflictDecision::NoConflict(NoConflictReason::BlankSavedEntry)
            }
            Some(saved) if saved == starter => {
                // Storage already holds the starter; no need to write it again.
                self.state.last_flushed_content = Some(saved);
                self.mark_dirty();
                ConflictDecision::NoConflict(NoConflictReason::MatchesStarter)
            }
            Some(saved) => match self.preference.is_disabled(&self.storage) {
                Ok(true) => ConflictDecision::Suppressed,
                Ok(false) => ConflictDecision::Offer {
                    saved_content: saved,
                },
                Err(e) => {
                    // An unreadable preference must not hide the user's draft.
                    self.report_storage_failure("reading resume preference", &e);
                    ConflictDecision::Offer {
                        saved_content: saved,
                    }
                }
            },
        };

        tracing::info!(key = %storage_key, decision = decision.label(), "Session initialized");
        decision
    }

    /// Recomputes `dirty` from the live editor content. Never writes.
    pub fn mark_dirty(&mut self) {
        let content = self.adapter.get_content();
        self.state.dirty = content != self.baseline();
    }

    /// Persists the current content if it is non-blank and changed.
    pub fn flush_now(&mut self) -> FlushResult {
        self.flush(false)
    }

    /// Replaces the editor content with a resumed draft and marks it clean.
    pub fn apply_resumed_content(&mut self, content: &str) -> FlushResult {
        self.adapter.set_content(content);
        self.flush(true)
    }

    /// Explicit save (Ctrl/Cmd+S). Writes non-blank content even when clean
    /// and tells the user what happened.
    pub fn save_now(&mut self) -> FlushResult {
        let result = self.flush(true);
        match result {
            FlushResult::Written | FlushResult::Unchanged => {
                self.notifier.notify(SAVED_MESSAGE, Severity::Success)
            }
            FlushResult::SkippedBlank => {
                self.notifier.notify(NOTHING_TO_SAVE_MESSAGE, Severity::Info)
            }
            FlushResult::NoSession | FlushResult::StorageUnavailable => {}
        }
        result
    }

    /// Deletes the saved draft for this session.
    pub fn discard_saved(&mut self) -> bool {
        let Some(storage_key) = self.storage_key() else {
            return false;
        };
        match self.storage.remove(&storage_key) {
            Ok(()) => {
                self.state.last_flushed_content = None;
                self.mark_dirty();
                tracing::info!(key = %storage_key, "Saved draft discarded");
                true
            }
            Err(e) => {
                self.report_storage_failure("discarding saved draft", &e);
                false
            }
        }
    }

    /// Turns resume prompts off for every session. The user is only told it
    /// worked when the preference was actually stored.
    pub fn disable_resume_prompts(&mut self) -> bool {
        match self.preference.disable(&mut self.storage) {
            Ok(()) => {
                tracing::info!("Resume prompts disabled");
                self.notifier.notify(PROMPTS_DISABLED_MESSAGE, Severity::Success);
                true
            }
            Err(e) => {
                self.report_storage_failure("saving resume preference", &e);
                false
            }
        }
    }

    pub fn resume_prompts_disabled(&self) -> bool {
        self.preference.is_disabled(&self.storage).unwrap_or(false)
    }

    /// The draft currently held in storage for this session.
    pub fn saved_entry(&self) -> Option<PersistedEntry> {
        let key = self.key.clone()?;
        let content = self
            .storage
            .get(&key.storage_key(&self.content_key_prefix))
            .ok()
            .flatten()?;
        Some(PersistedEntry { key, content })
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn starter_content(&self) -> Option<&str> {
        self.starter.as_deref()
    }

    pub fn content(&self) -> String {
        self.adapter.get_content()
    }

    pub fn adapter_mut(&mut self) -> &mut dyn EditorAdapter {
        &mut *self.adapter
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn flush(&mut self, force: bool) -> FlushResult {
        let Some(storage_key) = self.storage_key() else {
            return FlushResult::NoSession;
        };

        let content = self.adapter.get_content();
        if is_blank(&content) {
            self.state.dirty = content != self.baseline();
            tracing::debug!(key = %storage_key, "Skipping flush of blank content");
            return FlushResult::SkippedBlank;
        }

        if !force && content == self.baseline() {
            self.state.dirty = false;
            return FlushResult::Unchanged;
        }

        match self.storage.set(&storage_key, &content) {
            Ok(()) => {
                tracing::debug!(key = %storage_key, bytes = content.len(), "Flushed draft");
                self.state.last_flushed_content = Some(content);
                self.state.dirty = false;
                FlushResult::Written
            }
            Err(e) => {
                self.state.dirty = content != self.baseline();
                self.report_storage_failure("writing draft", &e);
                FlushResult::StorageUnavailable
            }
        }
    }

    fn baseline(&self) -> &str {
        self.state
            .last_flushed_content
            .as_deref()
            .or(self.starter.as_deref())
            .unwrap_or_default()
    }

    fn storage_key(&self) -> Option<String> {
        self.key.as_ref().map(|k| k.storage_key(&self.content_key_prefix))
    }

    fn report_storage_failure(&mut self, operation: &'static str, error: &StorageError) {
        if self.storage_failure_reported {
            tracing::debug!(operation, error = %error, "Storage still unavailable");
            return;
        }
        tracing::warn!(
            operation,
            error = %error,
            quota = error.is_quota(),
            "Storage unavailable, continuing in memory"
        );
        self.storage_failure_reported = true;
        self.notifier.notify(STORAGE_UNAVAILABLE_MESSAGE, Severity::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::PlainTextAdapter;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStore;

    fn session_with(
        storage: MemoryStore,
        starter: &str,
    ) -> SessionStore<MemoryStore, RecordingNotifier> {
        SessionStore::new(
            Box::new(PlainTextAdapter::new(starter)),
            storage,
            RecordingNotifier::new(),
            &SessionConfig::default(),
        )
    }

    fn saved(key: &str, content: &str) -> MemoryStore {
        let mut storage = MemoryStore::new();
        storage.set(&format!("code_{}", key), content).unwrap();
        storage
    }

    #[test]
    fn test_no_entry_means_no_conflict() {
        let mut session = session_with(MemoryStore::new(), "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(
            decision,
            ConflictDecision::NoConflict(NoConflictReason::NoSavedEntry)
        );
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_whitespace_entry_is_not_resumable() {
        let mut session = session_with(saved("/c/1", "  \n\t"), "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(
            decision,
            ConflictDecision::NoConflict(NoConflictReason::BlankSavedEntry)
        );
    }

    #[test]
    fn test_entry_equal_to_starter_is_not_a_conflict() {
        let mut session = session_with(saved("/c/1", "pass"), "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(
            decision,
            ConflictDecision::NoConflict(NoConflictReason::MatchesStarter)
        );
        assert_eq!(session.state().last_flushed_content.as_deref(), Some("pass"));
    }

    #[test]
    fn test_differing_entry_is_offered() {
        let mut session = session_with(saved("/c/1", "print('hi')"), "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(decision.saved_content(), Some("print('hi')"));
        // Offering never applies the draft by itself.
        assert_eq!(session.content(), "pass");
    }

    #[test]
    fn test_disabled_preference_suppresses_offer_and_keeps_starter() {
        let mut storage = saved("/c/1", "print('hi')");
        ResumePreference::default().disable(&mut storage).unwrap();

        let mut session = session_with(storage, "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(decision, ConflictDecision::Suppressed);
        assert!(decision.is_conflict());
        assert_eq!(session.content(), "pass");
        assert_eq!(
            session.saved_entry().unwrap().content,
            "print('hi')".to_string()
        );
    }

    #[test]
    fn test_mark_dirty_tracks_content_against_starter() {
        let mut session = session_with(MemoryStore::new(), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        session.adapter_mut().set_content("x = 1");
        session.mark_dirty();
        assert!(session.is_dirty());

        session.adapter_mut().set_content("pass");
        session.mark_dirty();
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_flush_writes_and_clears_dirty() {
        let mut session = session_with(MemoryStore::new(), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        session.adapter_mut().set_content("x = 1");
        session.mark_dirty();

        assert_eq!(session.flush_now(), FlushResult::Written);
        assert!(!session.is_dirty());
        assert_eq!(
            session.storage().get("code_/c/1").unwrap().as_deref(),
            Some("x = 1")
        );
    }

    #[test]
    fn test_flush_when_clean_does_not_write() {
        let mut session = session_with(saved("/c/1", "old draft"), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        assert_eq!(session.flush_now(), FlushResult::Unchanged);
        assert_eq!(
            session.storage().get("code_/c/1").unwrap().as_deref(),
            Some("old draft")
        );
    }

    #[test]
    fn test_flush_before_initialize_has_no_session() {
        let mut session = session_with(MemoryStore::new(), "pass");
        assert_eq!(session.flush_now(), FlushResult::NoSession);
    }

    #[test]
    fn test_blank_flush_keeps_prior_draft_and_stays_dirty() {
        let mut session = session_with(MemoryStore::new(), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        session.adapter_mut().set_content("x = 1");
        session.flush_now();

        session.adapter_mut().set_content("");
        session.mark_dirty();
        assert_eq!(session.flush_now(), FlushResult::SkippedBlank);
        assert!(session.is_dirty());
        assert_eq!(session.saved_entry().unwrap().content, "x = 1");
    }

    #[test]
    fn test_apply_resumed_content_is_clean() {
        let mut session = session_with(saved("/c/1", "print('hi')"), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        assert_eq!(
            session.apply_resumed_content("print('hi')"),
            FlushResult::Written
        );
        assert_eq!(session.content(), "print('hi')");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_save_now_notifies_success() {
        let mut session = session_with(MemoryStore::new(), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        assert_eq!(session.save_now(), FlushResult::Written);
        let last = session.notifier().last().unwrap();
        assert_eq!(last.message, SAVED_MESSAGE);
        assert_eq!(last.severity, Severity::Success);
    }

    #[test]
    fn test_save_now_blank_reports_nothing_to_save() {
        let mut session = session_with(MemoryStore::new(), "");
        session.initialize(SessionKey::new("/c/1"), String::new());

        assert_eq!(session.save_now(), FlushResult::SkippedBlank);
        assert_eq!(session.notifier().last().unwrap().message, NOTHING_TO_SAVE_MESSAGE);
        assert!(session.storage().is_empty());
    }

    #[test]
    fn test_storage_failure_is_reported_once() {
        let mut session = session_with(MemoryStore::unavailable(), "pass");
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert_eq!(
            decision,
            ConflictDecision::NoConflict(NoConflictReason::StorageUnavailable)
        );

        session.adapter_mut().set_content("x = 1");
        session.mark_dirty();
        assert_eq!(session.flush_now(), FlushResult::StorageUnavailable);
        assert_eq!(session.flush_now(), FlushResult::StorageUnavailable);

        assert!(session.is_dirty());
        assert_eq!(session.notifier().history().len(), 1);
        assert_eq!(
            session.notifier().last().unwrap().message,
            STORAGE_UNAVAILABLE_MESSAGE
        );
        assert_eq!(session.notifier().count(Severity::Info), 1);
    }

    #[test]
    fn test_quota_failure_degrades_and_keeps_dirty() {
        let mut session = session_with(MemoryStore::with_quota(16), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        session
            .adapter_mut()
            .set_content("a draft far larger than the quota allows");
        session.mark_dirty();

        assert_eq!(session.flush_now(), FlushResult::StorageUnavailable);
        assert!(session.is_dirty());
        assert!(session.storage().is_empty());
    }

    /// Fails every operation on one key and passes the rest through.
    struct FailingKeyStore {
        inner: MemoryStore,
        failing_key: &'static str,
    }

    impl FailingKeyStore {
        fn check(&self, key: &str) -> crate::error::StorageResult<()> {
            if key == self.failing_key {
                Err(StorageError::unavailable("injected failure"))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStore for FailingKeyStore {
        fn get(&self, key: &str) -> crate::error::StorageResult<Option<String>> {
            self.check(key)?;
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> crate::error::StorageResult<()> {
            self.check(key)?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> crate::error::StorageResult<()> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    fn preference_failing(
        storage: MemoryStore,
    ) -> SessionStore<FailingKeyStore, RecordingNotifier> {
        SessionStore::new(
            Box::new(PlainTextAdapter::new("pass")),
            FailingKeyStore {
                inner: storage,
                failing_key: crate::config::DEFAULT_RESUME_PREFERENCE_KEY,
            },
            RecordingNotifier::new(),
            &SessionConfig::default(),
        )
    }

    #[test]
    fn test_unreadable_preference_still_offers_draft() {
        let mut session = preference_failing(saved("/c/1", "print('hi')"));
        let decision = session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        assert_eq!(decision.saved_content(), Some("print('hi')"));
        assert_eq!(
            session.notifier().last().unwrap().message,
            STORAGE_UNAVAILABLE_MESSAGE
        );
    }

    #[test]
    fn test_failed_disable_is_not_confirmed() {
        let mut session = preference_failing(MemoryStore::new());
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());

        assert!(!session.disable_resume_prompts());
        let messages: Vec<_> = session
            .notifier()
            .history()
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(messages, vec![STORAGE_UNAVAILABLE_MESSAGE]);
        assert_eq!(session.notifier().count(Severity::Success), 0);
    }

    #[test]
    fn test_disable_resume_prompts_confirms() {
        let mut session = session_with(MemoryStore::new(), "pass");
        assert!(session.disable_resume_prompts());
        assert!(session.resume_prompts_disabled());
        assert_eq!(
            session.notifier().last().unwrap().message,
            PROMPTS_DISABLED_MESSAGE
        );
    }

    #[test]
    fn test_discard_saved_removes_entry() {
        let mut session = session_with(saved("/c/1", "draft"), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        assert!(session.discard_saved());
        assert!(session.saved_entry().is_none());
    }

    #[test]
    fn test_repeated_initialize_keeps_first_starter() {
        let mut session = session_with(MemoryStore::new(), "pass");
        session.initialize(SessionKey::new("/c/1"), "pass".to_string());
        session.initialize(SessionKey::new("/c/1"), "something else".to_string());
        assert_eq!(session.starter_content(), Some("pass"));
        assert!(!session.is_dirty());
    }
}
