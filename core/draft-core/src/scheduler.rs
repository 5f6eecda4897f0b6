//! Fixed-interval flush timer.
//!
//! Driven by the page's event loop: the owner calls [`FlushScheduler::poll`]
//! with the current time and flushes when it returns `true`. Missed ticks are
//! not replayed; a late poll fires once and schedules the next tick one
//! interval after it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FlushScheduler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FlushScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Starts ticking; the first tick is one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Stops ticking. A cancelled scheduler never fires again until re-armed.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns `true` when a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
