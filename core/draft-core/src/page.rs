//! One editor page, from load to teardown.
//!
//! Owns the session, the resume prompt, the unload guard and the flush timer,
//! and routes page events to them. Every method runs to completion on the
//! page's single execution context.

use std::time::Instant;

use crate::adapter::EditorAdapter;
use crate::config::SessionConfig;
use crate::notify::Notifier;
use crate::prompt::{PromptOutcome, ResumePromptController};
use crate::scheduler::FlushScheduler;
use crate::session::{ConflictDecision, FlushResult, SessionKey, SessionStore};
use crate::storage::KeyValueStore;
use crate::unload::{UnloadDecision, UnloadGuard};

pub struct EditorPage<S, N> {
    session: SessionStore<S, N>,
    decision: ConflictDecision,
    prompt: ResumePromptController,
    guard: UnloadGuard,
    scheduler: FlushScheduler,
    torn_down: bool,
}

impl<S: KeyValueStore, N: Notifier> EditorPage<S, N> {
    /// Loads the page for `route`.
    ///
    /// The starter content is whatever the mounted editor holds right now.
    /// The flush timer stays idle while a resume prompt is open and is armed
    /// once the prompt is dismissed, so no tick can overwrite the offered
    /// draft before the user has answered.
    pub fn load(
        adapter: Box<dyn EditorAdapter>,
        storage: S,
        notifier: N,
        config: &SessionConfig,
        route: &str,
        now: Instant,
    ) -> Self {
        let starter = adapter.get_content();
        let mut session = SessionStore::new(adapter, storage, notifier, config);
        let decision = session.initialize(SessionKey::from_route(route), starter);

        let mut prompt = ResumePromptController::new();
        prompt.present(&decision);

        let mut scheduler = FlushScheduler::new(config.flush_interval());
        if !prompt.is_visible() {
            scheduler.arm(now);
        }

        EditorPage {
            session,
            decision,
            prompt,
            guard: UnloadGuard::new(),
            scheduler,
            torn_down: false,
        }
    }

    pub fn decision(&self) -> &ConflictDecision {
        &self.decision
    }

    /// The user typed; `content` is the editor's new text.
    pub fn on_input(&mut self, content: &str) {
        self.session.adapter_mut().set_content(content);
        self.session.mark_dirty();
    }

    /// Timer callback. Returns the flush result when a tick was due.
    pub fn on_tick(&mut self, now: Instant) -> Option<FlushResult> {
        if !self.scheduler.poll(now) {
            return None;
        }
        Some(self.session.flush_now())
    }

    pub fn on_save_shortcut(&mut self) -> FlushResult {
        self.session.save_now()
    }

    pub fn on_before_unload(&mut self) -> UnloadDecision {
        self.guard.on_before_unload(&mut self.session)
    }

    pub fn resume(&mut self, now: Instant) -> Option<PromptOutcome> {
        let outcome = self.prompt.resume(&mut self.session)?;
        self.start_ticking(now);
        Some(outcome)
    }

    pub fn start_fresh(&mut self, now: Instant) -> Option<PromptOutcome> {
        let outcome = self.prompt.start_fresh()?;
        self.start_ticking(now);
        Some(outcome)
    }

    pub fn never_ask_again(&mut self, now: Instant) -> Option<PromptOutcome> {
        let outcome = self.prompt.never_ask_again(&mut self.session)?;
        self.start_ticking(now);
        Some(outcome)
    }

    /// Page is going away; the timer stops for good.
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.torn_down = true;
    }

    fn start_ticking(&mut self, now: Instant) {
        if !self.torn_down {
            self.scheduler.arm(now);
        }
    }

    pub fn prompt(&self) -> &ResumePromptController {
        &self.prompt
    }

    pub fn session(&self) -> &SessionStore<S, N> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore<S, N> {
        &mut self.session
    }
}
