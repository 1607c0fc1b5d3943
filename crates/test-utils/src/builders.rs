#![allow(dead_code)]

use std::collections::BTreeMap;

use taskweave::config::{ProjectConfig, ProjectMeta, TaskConfig};

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    project: Option<ProjectMeta>,
    tasks: BTreeMap<String, TaskConfig>,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            project: None,
            tasks: BTreeMap::new(),
        }
    }

    pub fn with_project(mut self, name: &str) -> Self {
        let meta = ProjectMeta {
            name: name.to_string(),
            ..ProjectMeta::default()
        };
        self.project = Some(meta);
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.tasks.insert(name.to_string(), task);
        self
    }

    /// Shorthand for a task with only a command and dependencies.
    pub fn with_simple(self, name: &str, cmd: &str, deps: &[&str]) -> Self {
        let mut task = TaskConfigBuilder::new(cmd);
        for dep in deps {
            task = task.depends_on(dep);
        }
        self.with_task(name, task.build())
    }

    pub fn build(self) -> ProjectConfig {
        ProjectConfig {
            project: self.project,
            tasks: self.tasks,
        }
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig::new(cmd),
        }
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn watch_dir(mut self, dir: &str) -> Self {
        self.task
            .watch_dirs
            .get_or_insert_with(Vec::new)
            .push(dir.to_string());
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.task.timeout = Some(secs);
        self
    }

    pub fn fail_on_dirty_branch(mut self, val: bool) -> Self {
        self.task.fail_on_dirty_branch = val;
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
