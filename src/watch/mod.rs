// src/watch/mod.rs

//! Watch mode: re-run a task whenever files under its watch directories
//! change.
//!
//! This module is responsible for:
//! - Choosing which directories to watch for a task.
//! - Compiling the built-in and project ignore rules.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Coalescing bursts of changes into one re-run per quiet period.
//!
//! It does **not** know how tasks are run; the re-run is a [`WatchCallback`].

pub mod dirs;
pub mod ignore;
pub mod path_utils;
pub mod pending;
pub mod watcher;

/// Quiet period after the last change before the callback fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub use dirs::{resolve_watch_dirs, DEFAULT_WATCH_DIRS};
pub use ignore::{IgnoreRules, BUILTIN_IGNORES, IGNORE_FILE_NAME};
pub use pending::{Debounce, PendingChanges};
pub use watcher::{qualifying_paths, run_watch_loop, watch, WatchCallback};
