//! User-visible notifications.
//!
//! Fire-and-forget; the surface that renders them auto-dismisses after a few
//! seconds. The session layer never waits on or inspects a notification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn notify(&mut self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&mut self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

/// Emits notifications as tracing events, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        tracing::info!(severity = ?severity, "{}", message);
    }
}

/// Keeps every notification it receives, oldest first.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    history: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Notification] {
        &self.history
    }

    pub fn last(&self) -> Option<&Notification> {
        self.history.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.history
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.history.push(Notification {
            message: message.to_string(),
            severity,
        });
    }
}
