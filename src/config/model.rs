// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Top-level project configuration as read from `taskweave.toml`.
///
/// ```toml
/// [project]
/// name = "demo"
///
/// [tasks.install]
/// command = "pip install -e ."
///
/// [tasks.test]
/// command = "pytest {snip:pytest-flags}"
/// depends_on = ["install"]
/// watch_dirs = ["src", "tests"]
/// timeout = 300
/// ```
///
/// The orchestrator treats this as an immutable snapshot; it is reloaded on
/// every invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Optional `[project]` metadata.
    #[serde(default)]
    pub project: Option<ProjectMeta>,

    /// All tasks from `[tasks.<name>]`, keyed by task name.
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,
}

impl ProjectConfig {
    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.get(name)
    }

    /// Project metadata with defaults applied for missing fields.
    pub fn metadata(&self) -> ProjectMeta {
        self.project.clone().unwrap_or_default()
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    #[serde(default = "default_project_name")]
    pub name: String,

    #[serde(default = "default_project_version")]
    pub version: String,

    #[serde(default)]
    pub description: String,
}

fn default_project_name() -> String {
    "Unknown".to_string()
}

fn default_project_version() -> String {
    "0.0.0".to_string()
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            version: default_project_version(),
            description: String::new(),
        }
    }
}

/// `[tasks.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute. May contain `{snip:<name>}` references.
    pub command: String,

    /// Tasks that must complete successfully before this one, in order.
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Directories (relative to the project root) to watch in watch mode.
    ///
    /// If `None`, `src/` and `tests/` (or the root) are watched.
    #[serde(default)]
    pub watch_dirs: Option<Vec<String>>,

    /// Timeout in seconds; the process is killed when exceeded.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Refuse to run when the repository has uncommitted changes.
    #[serde(default)]
    pub fail_on_dirty_branch: bool,
}

impl TaskConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            depends_on: Vec::new(),
            watch_dirs: None,
            timeout: None,
            fail_on_dirty_branch: false,
        }
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
