// src/watch/pending.rs

//! Pending change set and the single-slot debounce deadline.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

use crate::watch::path_utils::display_path;

/// How many changed paths a summary lists by name.
pub const SUMMARY_LIMIT: usize = 5;

/// Paths changed since the last trigger.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    paths: BTreeSet<PathBuf>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed path. Returns `false` if it was already pending.
    pub fn record(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Take every pending path, leaving the set empty.
    pub fn drain(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths).into_iter().collect()
    }
}

/// One debounce deadline; restarting replaces it instead of stacking timers.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// (Re)arm the deadline `window` after `now`, replacing any pending one.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Human-readable lines describing a drained change set.
pub fn summary(root: &Path, changed: &[PathBuf]) -> Vec<String> {
    let mut lines = Vec::with_capacity(SUMMARY_LIMIT + 2);
    let noun = if changed.len() == 1 { "file" } else { "files" };
    lines.push(format!("{} {} changed", changed.len(), noun));

    for path in changed.iter().take(SUMMARY_LIMIT) {
        lines.push(format!("  - {}", display_path(root, path)));
    }

    if changed.len() > SUMMARY_LIMIT {
        lines.push(format!("  ... and {} more", changed.len() - SUMMARY_LIMIT));
    }

    lines
}
