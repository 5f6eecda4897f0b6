//! Command implementations.
//!
//! Each command opens the drafts file fresh, does one thing, and writes a
//! human-readable result to `out`. Errors are returned as strings for the
//! entry point to print.

use fs_err as fs;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use draft_core::config::load_session_config;
use draft_core::{
    ConflictDecision, FileStore, FlushResult, KeyValueStore, NoConflictReason, Notifier,
    PlainTextAdapter, ResumePreference, SessionConfig, SessionKey, SessionStore, Severity,
    StorageConfig, TracingNotifier,
};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptsAction {
    /// Show whether resume prompts are enabled
    Status,
    /// Re-enable resume prompts
    Enable,
    /// Never show resume prompts
    Disable,
}

/// Prints notifications as plain lines.
struct ConsoleNotifier<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> Notifier for ConsoleNotifier<'_, W> {
    fn notify(&mut self, message: &str, severity: Severity) {
        let marker = match severity {
            Severity::Success => "✓",
            Severity::Info => "i",
        };
        let _ = writeln!(self.out, "{} {}", marker, message);
    }
}

fn open(storage: &StorageConfig) -> Result<(FileStore, SessionConfig), String> {
    let config = load_session_config(storage);
    let store = FileStore::load(&storage.drafts_file())
        .map_err(|e| format!("Failed to open drafts: {}", e))?
        .with_quota(config.storage_quota_bytes);
    Ok((store, config))
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn io_err(e: std::io::Error) -> String {
    format!("Failed to write output: {}", e)
}

pub fn list<W: Write>(storage: &StorageConfig, out: &mut W) -> Result<(), String> {
    let (store, config) = open(storage)?;

    let mut count = 0;
    for (storage_key, stored) in store.entries() {
        let Some(key) = SessionKey::from_storage_key(storage_key, &config.content_key_prefix)
        else {
            continue;
        };
        count += 1;
        writeln!(
            out,
            "{}\t{} bytes\t{}",
            key,
            stored.value.len(),
            stored
                .updated_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        )
        .map_err(io_err)?;
    }

    if count == 0 {
        writeln!(out, "No saved drafts.").map_err(io_err)?;
    }
    Ok(())
}

pub fn show<W: Write>(storage: &StorageConfig, route: &str, out: &mut W) -> Result<(), String> {
    let (store, config) = open(storage)?;
    let key = SessionKey::from_route(route);

    let content = store
        .get(&key.storage_key(&config.content_key_prefix))
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No saved draft for {}", key))?;
    write!(out, "{}", content).map_err(io_err)?;
    if !content.ends_with('\n') {
        writeln!(out).map_err(io_err)?;
    }
    Ok(())
}

pub fn check<W: Write>(
    storage: &StorageConfig,
    route: &str,
    starter_path: &Path,
    out: &mut W,
) -> Result<(), String> {
    let (mut store, config) = open(storage)?;
    let starter = read_file(starter_path)?;

    // Read-only: initialize never writes, and notifications only go to the log.
    let mut session = SessionStore::new(
        Box::new(PlainTextAdapter::new(&starter)),
        &mut store,
        TracingNotifier,
        &config,
    );
    let decision = session.initialize(SessionKey::from_route(route), starter);

    let summary = match decision {
        ConflictDecision::NoConflict(NoConflictReason::NoSavedEntry) => {
            "no conflict: nothing saved".to_string()
        }
        ConflictDecision::NoConflict(NoConflictReason::BlankSavedEntry) => {
            "no conflict: saved draft is blank".to_string()
        }
        ConflictDecision::NoConflict(NoConflictReason::MatchesStarter) => {
            "no conflict: saved draft matches the starter".to_string()
        }
        ConflictDecision::NoConflict(NoConflictReason::StorageUnavailable) => {
            "no conflict: storage unavailable".to_string()
        }
        ConflictDecision::Suppressed => {
            "conflict: saved draft differs, prompts are disabled (starter kept)".to_string()
        }
        ConflictDecision::Offer { saved_content } => format!(
            "conflict: would offer to resume a {}-line draft",
            saved_content.lines().count()
        ),
    };
    writeln!(out, "{}", summary).map_err(io_err)
}

pub fn save<W: Write>(
    storage: &StorageConfig,
    route: &str,
    file: &Path,
    out: &mut W,
) -> Result<(), String> {
    let (mut store, config) = open(storage)?;
    let content = read_file(file)?;

    let mut session = SessionStore::new(
        Box::new(PlainTextAdapter::new(&content)),
        &mut store,
        ConsoleNotifier { out },
        &config,
    );
    session.initialize(SessionKey::from_route(route), content);

    match session.save_now() {
        FlushResult::StorageUnavailable => Err("Failed to save draft: storage unavailable".into()),
        _ => Ok(()),
    }
}

pub fn clear<W: Write>(storage: &StorageConfig, route: &str, out: &mut W) -> Result<(), String> {
    let (mut store, config) = open(storage)?;
    let key = SessionKey::from_route(route);

    let existed = store
        .get(&key.storage_key(&config.content_key_prefix))
        .map_err(|e| e.to_string())?
        .is_some();
    if !existed {
        return writeln!(out, "No saved draft for {}", key).map_err(io_err);
    }

    let mut session = SessionStore::new(
        Box::new(PlainTextAdapter::default()),
        &mut store,
        ConsoleNotifier { out: &mut *out },
        &config,
    );
    session.initialize(key.clone(), String::new());
    if !session.discard_saved() {
        return Err(format!("Failed to delete draft for {}", key));
    }
    drop(session);

    tracing::info!(key = %key, "Draft cleared");
    writeln!(out, "Deleted saved draft for {}", key).map_err(io_err)
}

pub fn prompts<W: Write>(
    storage: &StorageConfig,
    action: PromptsAction,
    out: &mut W,
) -> Result<(), String> {
    let (mut store, config) = open(storage)?;
    let preference = ResumePreference::new(config.resume_preference_key);

    match action {
        PromptsAction::Status => {}
        PromptsAction::Enable => preference
            .clear(&mut store)
            .map_err(|e| format!("Failed to enable prompts: {}", e))?,
        PromptsAction::Disable => preference
            .disable(&mut store)
            .map_err(|e| format!("Failed to disable prompts: {}", e))?,
    }

    let disabled = preference.is_disabled(&store).map_err(|e| e.to_string())?;
    writeln!(
        out,
        "Resume prompts are {}",
        if disabled { "disabled" } else { "enabled" }
    )
    .map_err(io_err)
}
