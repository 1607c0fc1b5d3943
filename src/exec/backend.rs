// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The orchestrator hands each planned task to an `ExecutorBackend` instead
//! of spawning processes itself. Production uses [`ProcessExecutor`]; tests
//! provide a fake that records what would have run.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;
use crate::exec::task_runner::run_command;
use crate::exec::ScheduledTask;
use crate::shutdown::Shutdown;
use crate::snippets::{expand, SnippetLookup};

/// Trait abstracting how a single planned task is executed.
pub trait ExecutorBackend: Send {
    /// Run `task` to completion and return its exit code.
    ///
    /// A non-zero exit code is `Ok`; only failures to run at all (spawn
    /// errors, timeout, cancellation) are `Err`.
    fn run_one(
        &mut self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>>;
}

/// Real executor: expands snippets, then runs the command through the shell.
pub struct ProcessExecutor {
    snippets: Arc<dyn SnippetLookup>,
    shutdown: Shutdown,
}

impl ProcessExecutor {
    pub fn new(snippets: Arc<dyn SnippetLookup>, shutdown: Shutdown) -> Self {
        Self { snippets, shutdown }
    }
}

impl std::fmt::Debug for ProcessExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessExecutor").finish_non_exhaustive()
    }
}

impl ExecutorBackend for ProcessExecutor {
    fn run_one(
        &mut self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        let command = expand(&task.command, self.snippets.as_ref());
        let shutdown = self.shutdown.clone();

        Box::pin(async move {
            run_command(
                &task.name,
                &command,
                &task.cwd,
                &task.env,
                task.timeout,
                shutdown,
            )
            .await
        })
    }
}
