//! Configuration loading and saving utilities.
//!
//! Handles paths and persistence for:
//! - the drafts file (`~/.pyquest/drafts.json`)
//! - editor session tunables (`~/.pyquest/editor.json`)
//!
//! Reads are best-effort; malformed files return defaults to keep the editor usable.

use fs_err as fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_CONTENT_KEY_PREFIX: &str = "code_";
pub const DEFAULT_RESUME_PREFERENCE_KEY: &str = "disable_auto_resume_prompt";

/// Root directory for everything the editor persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl StorageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn drafts_file(&self) -> PathBuf {
        self.root.join("drafts.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("editor.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.clone()
    }
}

impl Default for StorageConfig {
    /// `~/.pyquest`, or `./.pyquest` when no home directory is known.
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|h| h.join(".pyquest"))
            .unwrap_or_else(|| PathBuf::from(".pyquest"));
        Self { root }
    }
}

/// Tunables for one editor page session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub flush_interval_secs: u64,
    pub content_key_prefix: String,
    pub resume_preference_key: String,
    /// Byte budget for the file backend; `None` means unbounded.
    pub storage_quota_bytes: Option<usize>,
}

impl SessionConfig {
    /// Flush interval, never shorter than one second.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            content_key_prefix: DEFAULT_CONTENT_KEY_PREFIX.to_string(),
            resume_preference_key: DEFAULT_RESUME_PREFERENCE_KEY.to_string(),
            storage_quota_bytes: None,
        }
    }
}

/// Loads session tunables, returning defaults if the file is missing or malformed.
pub fn load_session_config(storage: &StorageConfig) -> SessionConfig {
    load_session_config_from(&storage.config_file())
}

pub fn load_session_config_from(path: &Path) -> SessionConfig {
    let Ok(content) = fs::read_to_string(path) else {
        return SessionConfig::default();
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Malformed editor config, using defaults"
            );
            SessionConfig::default()
        }
    }
}

/// Saves session tunables to disk.
pub fn save_session_config(storage: &StorageConfig, config: &SessionConfig) -> Result<(), String> {
    let path = storage.config_file();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))
}
