//! Run progress feed.
//!
//! An append-only, bounded log of human-readable steps plus a single
//! percent/action pair, shared between the run loop (sole writer) and
//! any external observer (dashboard, CLI status). Readers only ever
//! get snapshots — no mutable reference to the live state escapes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Entries kept before the oldest is dropped.
const MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Point-in-time copy of the feed for external rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub entries: Vec<ProgressEntry>,
    pub percent: u8,
    pub current_action: String,
}

#[derive(Debug, Default)]
struct FeedInner {
    entries: VecDeque<ProgressEntry>,
    percent: u8,
    current_action: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressFeed {
    inner: Arc<Mutex<FeedInner>>,
}

impl ProgressFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FeedInner> {
        // The single writer never panics while holding the lock, but a
        // poisoned feed should still serve reads.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a timestamped entry, dropping the oldest beyond the cap.
    pub fn push(&self, message: impl Into<String>) {
        let mut inner = self.lock();
        inner.entries.push_back(ProgressEntry {
            at: Utc::now(),
            message: message.into(),
        });
        while inner.entries.len() > MAX_ENTRIES {
            inner.entries.pop_front();
        }
    }

    /// Update percent and current action. Percent is clamped to 100
    /// and never moves backwards within a run.
    pub fn set_action(&self, percent: u8, action: impl Into<String>) {
        let mut inner = self.lock();
        inner.percent = inner.percent.max(percent.min(100));
        inner.current_action = action.into();
    }

    /// Reset percent/action for a fresh run. The entry log carries
    /// over; it is bounded anyway and spans runs by design.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.percent = 0;
        inner.current_action.clear();
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let inner = self.lock();
        ProgressSnapshot {
            entries: inner.entries.iter().cloned().collect(),
            percent: inner.percent,
            current_action: inner.current_action.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_snapshot() {
        let feed = ProgressFeed::new();
        feed.push("starting");
        feed.set_action(10, "searching AutoTrader");
        let snap = feed.snapshot();
        assert_eq!(snap.entries.len(), 1);
        assert_eq!(snap.percent, 10);
        assert_eq!(snap.current_action, "searching AutoTrader");
    }

    #[test]
    fn test_bounded_to_most_recent() {
        let feed = ProgressFeed::new();
        for i in 0..150 {
            feed.push(format!("step {}", i));
        }
        let snap = feed.snapshot();
        assert_eq!(snap.entries.len(), MAX_ENTRIES);
        assert_eq!(snap.entries[0].message, "step 50", "oldest entries are dropped");
    }

    #[test]
    fn test_percent_is_monotone() {
        let feed = ProgressFeed::new();
        feed.set_action(40, "a");
        feed.set_action(20, "b");
        let snap = feed.snapshot();
        assert_eq!(snap.percent, 40, "percent must never move backwards");
        assert_eq!(snap.current_action, "b");

        feed.reset();
        assert_eq!(feed.snapshot().percent, 0);
    }

    #[test]
    fn test_percent_clamped() {
        let feed = ProgressFeed::new();
        feed.set_action(250, "overflow");
        assert_eq!(feed.snapshot().percent, 100);
    }
}
