// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Orchestration-level failures live here; a sub-task exiting non-zero is
//! *not* an error and travels as a plain exit code instead.

use std::time::Duration;

use thiserror::Error;

use crate::engine::TaskName;

#[derive(Error, Debug)]
pub enum TaskweaveError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskName),

    #[error("Circular dependency detected involving task: {0}")]
    CyclicDependency(TaskName),

    #[error("Git has uncommitted changes in {0}. Commit first or use --force")]
    GitDirty(String),

    #[error("Task '{task}' timed out after {} seconds", timeout.as_secs())]
    TaskTimeout { task: TaskName, timeout: Duration },

    #[error("{0}")]
    Runner(String),

    #[error("Interrupted")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskweaveError>;
