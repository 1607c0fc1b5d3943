// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::watch::DEFAULT_DEBOUNCE_MS;

/// Command-line arguments for `taskweave`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskweave",
    version,
    about = "Run project tasks in dependency order, optionally re-running on file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run. When omitted, the project's tasks are listed instead.
    #[arg(value_name = "TASK")]
    pub task: Option<String>,

    /// Project root containing `taskweave.toml`.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Isolated tooling root (e.g. a virtualenv) to activate for tasks.
    ///
    /// Default: `<root>/.venv` (ignored when it does not exist).
    #[arg(long, value_name = "DIR")]
    pub venv: Option<PathBuf>,

    /// Snippet file with a `[snippets]` table.
    ///
    /// Default: `~/.taskweave/snippets.toml`.
    #[arg(long, value_name = "PATH")]
    pub snippets: Option<PathBuf>,

    /// Re-run the task whenever watched files change.
    #[arg(short, long)]
    pub watch: bool,

    /// Skip the clean-repository check for `fail_on_dirty_branch` tasks.
    #[arg(short, long)]
    pub force: bool,

    /// Quiet period (milliseconds) after the last change before re-running.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Resolve and print the execution plan without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKWEAVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
