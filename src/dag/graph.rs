// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::ProjectConfig;
use crate::engine::TaskName;

/// In-memory task graph keyed by task name.
///
/// Each node keeps its `depends_on` list in declaration order. Nothing is
/// validated on construction: references to unknown tasks and cycles are
/// legal here and surface only when [`resolve`](crate::dag::resolve) walks
/// the part of the graph a run needs.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    deps: HashMap<TaskName, Vec<TaskName>>,
}

impl DagGraph {
    /// Build a graph from a project configuration snapshot.
    pub fn from_config(cfg: &ProjectConfig) -> Self {
        Self::from_edges(
            cfg.tasks
                .iter()
                .map(|(name, task)| (name.clone(), task.depends_on.clone())),
        )
    }

    /// Build a graph from `(task, dependencies)` pairs.
    pub fn from_edges<I, N, D>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<TaskName>,
        D: IntoIterator,
        D::Item: Into<TaskName>,
    {
        let deps = edges
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();
        Self { deps }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.deps.contains_key(name)
    }

    /// Immediate dependencies of a task (its `depends_on` list).
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.deps.get(name).map(|d| d.as_slice()).unwrap_or(&[])
    }
}
