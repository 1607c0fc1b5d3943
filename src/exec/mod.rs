// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`environment`] composes the environment task processes run with.
//! - [`task_runner`] spawns one shell command and waits for it (timeout and
//!   shutdown aware).
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `ProcessExecutor`, which tests can replace with a fake.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::model::TaskConfig;
use crate::engine::TaskName;
use crate::types::EnvMap;

pub mod backend;
pub mod environment;
pub mod task_runner;

pub use backend::{ExecutorBackend, ProcessExecutor};
pub use task_runner::run_command;

/// One step of an execution plan, ready to hand to an executor.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub name: TaskName,
    /// Command as configured; snippet references are not yet expanded.
    pub command: String,
    pub timeout: Option<Duration>,
    pub cwd: PathBuf,
    /// Shared by every step of one orchestration run.
    pub env: Arc<EnvMap>,
}

impl ScheduledTask {
    pub fn from_config(
        name: impl Into<TaskName>,
        cfg: &TaskConfig,
        cwd: impl Into<PathBuf>,
        env: Arc<EnvMap>,
    ) -> Self {
        Self {
            name: name.into(),
            command: cfg.command.clone(),
            timeout: cfg.timeout_duration(),
            cwd: cwd.into(),
            env,
        }
    }
}
