// src/watch/watcher.rs

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use notify::event::{CreateKind, RemoveKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::errors::Result;
use crate::shutdown::Shutdown;
use crate::watch::ignore::IgnoreRules;
use crate::watch::pending::{summary, Debounce, PendingChanges};

/// What watch mode re-runs after each quiet period.
pub trait WatchCallback: Send {
    /// Run once. Errors are reported by the watcher, which keeps watching.
    fn on_change(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Watch `dirs` recursively and call `callback` after every burst of
/// qualifying changes.
///
/// - Nonexistent or non-directory entries in `dirs` are skipped.
/// - `callback` runs once before any change is awaited.
/// - Returns when `shutdown` fires; monitoring stops when the notify
///   watcher is dropped on return.
pub async fn watch<C: WatchCallback>(
    dirs: &[PathBuf],
    rules: &IgnoreRules,
    window: Duration,
    callback: &mut C,
    shutdown: Shutdown,
) -> Result<()> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    trace!("watch loop gone; dropping notify event");
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    for dir in dirs {
        if !dir.is_dir() {
            debug!(?dir, "not a directory; not watching");
            continue;
        }
        watcher
            .watch(dir, RecursiveMode::Recursive)
            .with_context(|| format!("watching {:?}", dir))?;
        println!("[taskweave] watching {}", dir.display());
        info!(?dir, "file watcher registered");
    }

    let res = run_watch_loop(event_rx, rules, window, callback, shutdown).await;
    drop(watcher);
    res
}

/// The coalescing loop behind [`watch`], fed by any source of notify events.
///
/// Owns the pending change set and the debounce deadline. Qualifying,
/// non-ignored paths are recorded and push the deadline `window` into the
/// future; when the deadline passes the set is drained, summarised, and the
/// callback is awaited. Events arriving meanwhile stay queued in `events`
/// and feed the next round.
pub async fn run_watch_loop<C: WatchCallback>(
    mut events: mpsc::UnboundedReceiver<Event>,
    rules: &IgnoreRules,
    window: Duration,
    callback: &mut C,
    mut shutdown: Shutdown,
) -> Result<()> {
    let mut pending = PendingChanges::new();
    let mut debounce = Debounce::new(window);

    println!("[taskweave] initial run");
    if !run_callback(callback, &mut shutdown).await {
        info!("shutdown during initial run; watch stopped");
        return Ok(());
    }
    println!("[taskweave] watching for changes (Ctrl+C to stop)");

    loop {
        let deadline = debounce.deadline();

        tokio::select! {
            biased;

            _ = shutdown.triggered() => {
                info!("shutdown requested; stopping watcher");
                break;
            }

            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    info!("event source closed; stopping watcher");
                    break;
                };
                for path in qualifying_paths(&event) {
                    if rules.is_ignored(&path) {
                        trace!(?path, "ignored change");
                        continue;
                    }
                    debug!(?path, "change recorded");
                    pending.record(path);
                    debounce.restart(Instant::now());
                }
            }

            _ = wait_for(deadline) => {
                debounce.cancel();
                let changed = pending.drain();
                if changed.is_empty() {
                    continue;
                }

                println!();
                for line in summary(rules.root(), &changed) {
                    println!("[taskweave] {line}");
                }
                info!(count = changed.len(), "debounce elapsed; re-running");

                if !run_callback(callback, &mut shutdown).await {
                    info!("shutdown during triggered run; stopping watcher");
                    break;
                }
            }
        }
    }

    debounce.cancel();
    Ok(())
}

/// Paths of an event that count as file changes.
///
/// Create/modify/remove only; directory creation/removal is skipped, but
/// events for files inside directories are not.
pub fn qualifying_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => Vec::new(),
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => event
            .paths
            .iter()
            .filter(|p| !is_existing_dir(p))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

fn is_existing_dir(path: &Path) -> bool {
    path.is_dir()
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

/// Await the callback unless shutdown fires first. Returns `false` on
/// shutdown; dropping the callback future kills any running child process.
async fn run_callback<C: WatchCallback>(callback: &mut C, shutdown: &mut Shutdown) -> bool {
    tokio::select! {
        biased;

        _ = shutdown.triggered() => false,

        res = callback.on_change() => {
            if let Err(err) = res {
                error!(error = %err, "triggered run failed; still watching");
                println!("[taskweave] error: {err}");
            }
            true
        }
    }
}
