// src/exec/environment.rs

//! Execution environment composition.
//!
//! Starts from the inherited environment and, when the project has an
//! isolated tooling root (a virtualenv), layers its activation on top.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::EnvMap;

/// Search path variable.
pub const PATH_VAR: &str = "PATH";
/// Marks the active isolated tooling root.
pub const TOOLING_MARKER_VAR: &str = "VIRTUAL_ENV";
/// Forces interpreter home resolution; must not leak into the isolated env.
pub const INTERPRETER_HOME_VAR: &str = "PYTHONHOME";
/// Package download cache, pointed at the shared cache directory.
pub const CACHE_DIR_VAR: &str = "PIP_CACHE_DIR";

/// Per-user state directory under the home directory.
pub const STATE_DIR_NAME: &str = ".taskweave";
const CACHE_DIR_NAME: &str = "pip-cache";

#[cfg(windows)]
const EXECUTABLE_DIR: &str = "Scripts";
#[cfg(not(windows))]
const EXECUTABLE_DIR: &str = "bin";

#[cfg(windows)]
const HOME_VARS: &[&str] = &["USERPROFILE", "HOME"];
#[cfg(not(windows))]
const HOME_VARS: &[&str] = &["HOME"];

/// Snapshot of the current process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn inherited() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            (k, _) => {
                debug!(var = ?k, "skipping non UTF-8 environment variable");
                None
            }
        })
        .collect()
}

/// Home directory according to `env`.
pub fn home_dir(env: &EnvMap) -> Option<PathBuf> {
    HOME_VARS
        .iter()
        .filter_map(|var| env.get(*var))
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `<home>/.taskweave/pip-cache`.
pub fn shared_cache_dir(home: &Path) -> PathBuf {
    home.join(STATE_DIR_NAME).join(CACHE_DIR_NAME)
}

/// Build the effective environment for task processes.
///
/// Without a tooling root, or when it does not exist on disk, `base` is
/// returned unchanged. Otherwise:
/// - its executable directory is prepended to `PATH`,
/// - `VIRTUAL_ENV` is set to the tooling root,
/// - `PYTHONHOME` is removed,
/// - `PIP_CACHE_DIR` points at the shared per-user cache, which is created
///   if missing.
pub fn compose(base: EnvMap, tooling: Option<&Path>) -> Result<EnvMap> {
    let Some(tooling) = tooling else {
        return Ok(base);
    };

    if !tooling.is_dir() {
        debug!(?tooling, "tooling root does not exist; using inherited environment");
        return Ok(base);
    }

    let mut env = base;
    let bin_dir = tooling.join(EXECUTABLE_DIR);

    let mut search_path = vec![bin_dir];
    if let Some(existing) = env.get(PATH_VAR) {
        search_path.extend(std::env::split_paths(existing));
    }
    let joined = std::env::join_paths(search_path)
        .with_context(|| format!("building {PATH_VAR} with tooling root {:?}", tooling))?;
    env.insert(PATH_VAR.to_string(), joined.to_string_lossy().into_owned());

    env.insert(
        TOOLING_MARKER_VAR.to_string(),
        tooling.to_string_lossy().into_owned(),
    );
    env.remove(INTERPRETER_HOME_VAR);

    match home_dir(&env) {
        Some(home) => {
            let cache = shared_cache_dir(&home);
            fs::create_dir_all(&cache)
                .with_context(|| format!("creating shared cache dir {:?}", cache))?;
            env.insert(
                CACHE_DIR_VAR.to_string(),
                cache.to_string_lossy().into_owned(),
            );
        }
        None => {
            warn!("no home directory in environment; shared package cache not configured");
        }
    }

    debug!(?tooling, "composed isolated tooling environment");
    Ok(env)
}
