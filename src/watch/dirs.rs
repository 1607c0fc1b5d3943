// src/watch/dirs.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;

/// Directories watched when a task declares no `watch_dirs`.
pub const DEFAULT_WATCH_DIRS: &[&str] = &["src", "tests"];

/// Resolve a task's watch directories against the project root.
///
/// Configured entries that do not exist are dropped. If nothing is left
/// (or nothing was configured and neither `src/` nor `tests/` exist), the
/// project root itself is watched.
pub fn resolve_watch_dirs(
    fs: &dyn FileSystem,
    root: &Path,
    task_dirs: Option<&[String]>,
) -> Vec<PathBuf> {
    let candidates: Vec<PathBuf> = match task_dirs {
        Some(dirs) if !dirs.is_empty() => dirs.iter().map(|d| root.join(d)).collect(),
        _ => DEFAULT_WATCH_DIRS.iter().map(|d| root.join(d)).collect(),
    };

    let existing: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|dir| {
            let keep = fs.is_dir(dir);
            if !keep {
                debug!(?dir, "watch directory does not exist; skipping");
            }
            keep
        })
        .collect();

    if existing.is_empty() {
        vec![root.to_path_buf()]
    } else {
        existing
    }
}
