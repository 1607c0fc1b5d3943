// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod git;
pub mod logging;
pub mod shutdown;
pub mod snippets;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_project_config, validate_config, ProjectConfig};
use crate::engine::{plan, Orchestrator, RerunTask};
use crate::errors::{Result, TaskweaveError};
use crate::exec::ProcessExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::git::GitCli;
use crate::snippets::{default_snippet_path, expand, SnippetLookup, SnippetStore};
use crate::types::Project;
use crate::watch::{resolve_watch_dirs, IgnoreRules};

/// Default isolated tooling directory under the project root.
pub const DEFAULT_TOOLING_DIR: &str = ".venv";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project binding and snippet store
/// - config loading
/// - orchestrator + process executor + git gate
/// - (optional) file watcher
/// - Ctrl-C handling
///
/// Returns the exit code the process should end with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project = project_from_args(&args)?;
    debug!(?project, "project binding");

    let cfg = load_project_config(fs.as_ref(), project.root())?;
    let snippets: Arc<dyn SnippetLookup> = Arc::new(load_snippets(fs.as_ref(), &args)?);

    let Some(task) = args.task.as_deref() else {
        print_task_list(&project, &cfg);
        return Ok(0);
    };

    for warning in validate_config(&cfg) {
        warn!("config: {warning}");
    }

    if args.dry_run {
        print_dry_run(&cfg, task, snippets.as_ref())?;
        return Ok(0);
    }

    let (trigger, shutdown) = shutdown::channel();
    shutdown::spawn_ctrl_c_listener(trigger);

    let executor = ProcessExecutor::new(snippets, shutdown.clone());
    let mut orchestrator = Orchestrator::new(executor, GitCli::new()).with_fs(Arc::clone(&fs));

    if !args.watch {
        return shutdown::cancellable(
            shutdown,
            orchestrator.run_with_config(&project, &cfg, task, args.force),
        )
        .await;
    }

    let task_cfg = cfg
        .task(task)
        .ok_or_else(|| TaskweaveError::TaskNotFound(task.to_string()))?;
    let dirs = resolve_watch_dirs(fs.as_ref(), project.root(), task_cfg.watch_dirs.as_deref());
    let rules = IgnoreRules::load(fs.as_ref(), project.root())?;
    info!(task = %task, ?dirs, patterns = rules.patterns().len(), "entering watch mode");

    let mut callback = RerunTask {
        orchestrator,
        project,
        task: task.to_string(),
        force: args.force,
    };

    watch::watch(
        &dirs,
        &rules,
        Duration::from_millis(args.debounce_ms),
        &mut callback,
        shutdown,
    )
    .await?;

    println!("[taskweave] stopped watching");
    Ok(0)
}

/// Build the project record from `--root` / `--venv`.
fn project_from_args(args: &CliArgs) -> Result<Project> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(TaskweaveError::Runner(format!(
            "Project root {} does not exist",
            root.display()
        )));
    }

    let name = project_name(&root);
    let tooling = args
        .venv
        .clone()
        .unwrap_or_else(|| root.join(DEFAULT_TOOLING_DIR));

    Ok(Project::new(name, root).with_tooling(tooling))
}

fn project_name(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

fn load_snippets(fs: &dyn FileSystem, args: &CliArgs) -> Result<SnippetStore> {
    let path: Option<PathBuf> = args.snippets.clone().or_else(default_snippet_path);
    match path {
        Some(path) => SnippetStore::load(fs, &path),
        None => Ok(SnippetStore::new()),
    }
}

/// Print every task with its command and dependencies.
fn print_task_list(project: &Project, cfg: &ProjectConfig) {
    let meta = cfg.metadata();
    println!("{} ({} v{})", project.name, meta.name, meta.version);
    if !meta.description.is_empty() {
        println!("  {}", meta.description);
    }
    println!();

    if cfg.tasks.is_empty() {
        println!("no tasks defined");
        return;
    }

    println!("tasks ({}):", cfg.tasks.len());
    for (name, task) in &cfg.tasks {
        println!("  - {name}");
        println!("      command: {}", task.command);
        if !task.depends_on.is_empty() {
            println!("      depends_on: {:?}", task.depends_on);
        }
        if let Some(dirs) = &task.watch_dirs {
            println!("      watch_dirs: {:?}", dirs);
        }
        if let Some(secs) = task.timeout {
            println!("      timeout: {secs}s");
        }
        if task.fail_on_dirty_branch {
            println!("      fail_on_dirty_branch: true");
        }
    }

    for warning in validate_config(cfg) {
        println!("warning: {warning}");
    }
}

/// Resolve the plan for `task` and print it with expanded commands.
fn print_dry_run(cfg: &ProjectConfig, task: &str, snippets: &dyn SnippetLookup) -> Result<()> {
    let order = plan(cfg, task)?;
    println!("taskweave dry-run: {task}");
    for (idx, name) in order.iter().enumerate() {
        let Some(step) = cfg.task(name) else {
            return Err(TaskweaveError::TaskNotFound(name.clone()));
        };
        println!("  {}. {}", idx + 1, name);
        println!("      $ {}", expand(&step.command, snippets));
        if let Some(secs) = step.timeout {
            println!("      timeout: {secs}s");
        }
    }
    debug!("dry-run complete (no execution)");
    Ok(())
}
