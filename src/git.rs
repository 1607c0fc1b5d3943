// src/git.rs

//! Repository cleanliness check used by `fail_on_dirty_branch` tasks.

use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;
use std::process::{Output, Stdio};

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;

pub const GIT_EXEC: &str = "git";

/// Answers "does this path have uncommitted changes?".
///
/// Production code uses [`GitCli`]; tests substitute a fake so gating can be
/// checked without a real repository.
pub trait RepoGate: Send + Sync {
    /// `true` if dirty. Paths outside version control are clean.
    fn is_dirty<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>>;
}

/// Gate backed by the `git` executable, run without blocking the runtime.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl RepoGate for GitCli {
    fn is_dirty<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(check_dirty(path))
    }
}

async fn check_dirty(path: &Path) -> Result<bool> {
    let inside = match git(path, &["rev-parse", "--is-inside-work-tree"]).await {
        Ok(output) => output.status.success(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("git executable not found; treating {:?} as unversioned", path);
            return Ok(false);
        }
        Err(err) => {
            return Err(anyhow::Error::from(err)
                .context(format!("running git in {:?}", path))
                .into());
        }
    };

    if !inside {
        debug!(?path, "not a git work tree; treating as clean");
        return Ok(false);
    }

    let output = git(path, &["status", "--porcelain", "--untracked-files=all"])
        .await
        .with_context(|| format!("running git status in {:?}", path))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git status failed in {:?}: {}",
            path,
            String::from_utf8_lossy(&output.stderr).trim()
        )
        .into());
    }

    let dirty = !output.stdout.iter().all(u8::is_ascii_whitespace);
    debug!(?path, dirty, "checked repository state");
    Ok(dirty)
}

async fn git(path: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new(GIT_EXEC)
        .arg("-C")
        .arg(path)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
}
