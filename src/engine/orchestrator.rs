// src/engine/orchestrator.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::loader::load_project_config;
use crate::config::model::ProjectConfig;
use crate::dag::{resolve, DagGraph};
use crate::engine::TaskName;
use crate::errors::{Result, TaskweaveError};
use crate::exec::environment;
use crate::exec::{ExecutorBackend, ScheduledTask};
use crate::fs::{FileSystem, RealFileSystem};
use crate::git::RepoGate;
use crate::types::{EnvMap, Project};
use crate::watch::WatchCallback;

/// Compute the execution plan for `task` without running anything.
pub fn plan(cfg: &ProjectConfig, task: &str) -> Result<Vec<TaskName>> {
    if cfg.task(task).is_none() {
        return Err(TaskweaveError::TaskNotFound(task.to_string()));
    }
    resolve(&DagGraph::from_config(cfg), task)
}

/// Runs a named task and its dependencies for one project.
///
/// Stateless between invocations: the configuration is reloaded, the
/// environment recomposed and the plan recomputed on every [`run`].
///
/// [`run`]: Orchestrator::run
pub struct Orchestrator<E: ExecutorBackend, G: RepoGate> {
    executor: E,
    gate: G,
    fs: Arc<dyn FileSystem>,
    base_env: EnvMap,
}

impl<E: ExecutorBackend, G: RepoGate> fmt::Debug for Orchestrator<E, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, G: RepoGate> Orchestrator<E, G> {
    /// Orchestrator over the real filesystem and the inherited environment.
    pub fn new(executor: E, gate: G) -> Self {
        Self {
            executor,
            gate,
            fs: Arc::new(RealFileSystem),
            base_env: environment::inherited(),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the environment tasks inherit (before tooling activation).
    pub fn with_base_env(mut self, env: EnvMap) -> Self {
        self.base_env = env;
        self
    }

    /// Load `taskweave.toml` from the project root and run `task`.
    pub async fn run(&mut self, project: &Project, task: &str, force: bool) -> Result<i32> {
        let cfg = load_project_config(self.fs.as_ref(), project.root())?;
        self.run_with_config(project, &cfg, task, force).await
    }

    /// Run `task` and its dependencies from an already-loaded configuration.
    ///
    /// Returns the exit code of the first failing task, or `0` if every task
    /// in the plan succeeded. Tasks after a failure are not started.
    pub async fn run_with_config(
        &mut self,
        project: &Project,
        cfg: &ProjectConfig,
        task: &str,
        force: bool,
    ) -> Result<i32> {
        let target = cfg
            .task(task)
            .ok_or_else(|| TaskweaveError::TaskNotFound(task.to_string()))?;

        if target.fail_on_dirty_branch && !force {
            if self.gate.is_dirty(project.root()).await? {
                warn!(task = %task, root = ?project.root(), "repository is dirty; refusing to run");
                return Err(TaskweaveError::GitDirty(project.root().display().to_string()));
            }
        } else if target.fail_on_dirty_branch {
            debug!(task = %task, "clean-repository check skipped (forced)");
        }

        let env = Arc::new(environment::compose(
            self.base_env.clone(),
            project.tooling(),
        )?);

        let order = resolve(&DagGraph::from_config(cfg), task)?;
        info!(project = %project.name, task = %task, plan = ?order, "starting orchestration run");

        let total = order.len();
        for (idx, name) in order.iter().enumerate() {
            let Some(step_cfg) = cfg.task(name) else {
                return Err(TaskweaveError::TaskNotFound(name.clone()));
            };

            println!("[taskweave] ▶ {} ({}/{})", name, idx + 1, total);
            let scheduled =
                ScheduledTask::from_config(name.clone(), step_cfg, project.root(), Arc::clone(&env));

            let code = self.executor.run_one(scheduled).await?;

            if code != 0 {
                println!("[taskweave] ✗ {} failed with exit code {}", name, code);
                warn!(task = %name, exit_code = code, "task failed; stopping run");
                return Ok(code);
            }

            println!("[taskweave] ✓ {}", name);
            debug!(task = %name, "task completed");
        }

        info!(task = %task, "orchestration run succeeded");
        Ok(0)
    }
}

/// Watch-mode callback: re-run one task through an orchestrator.
///
/// Errors and non-zero exit codes are reported and swallowed so the watch
/// session keeps going.
pub struct RerunTask<E: ExecutorBackend, G: RepoGate> {
    pub orchestrator: Orchestrator<E, G>,
    pub project: Project,
    pub task: TaskName,
    pub force: bool,
}

impl<E: ExecutorBackend, G: RepoGate> WatchCallback for RerunTask<E, G> {
    fn on_change(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let code = self
                .orchestrator
                .run(&self.project, &self.task, self.force)
                .await?;
            if code != 0 {
                warn!(task = %self.task, exit_code = code, "watched run failed");
            }
            Ok(())
        })
    }
}
