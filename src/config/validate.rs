// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ProjectConfig;

/// Check a configuration for problems and return human-readable warnings.
///
/// Nothing here blocks execution: the resolver re-checks the part of the
/// graph a run actually touches and fails hard there. This is the whole-file
/// view used when listing a project's tasks.
pub fn validate_config(cfg: &ProjectConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if cfg.project.is_none() {
        warnings.push("Missing [project] section".to_string());
    }

    if cfg.tasks.is_empty() {
        warnings.push("No tasks defined".to_string());
    }

    for (name, task) in cfg.tasks.iter() {
        if task.command.trim().is_empty() {
            warnings.push(format!("Task '{}' has an empty 'command'", name));
        }

        for dep in task.depends_on.iter() {
            if !cfg.tasks.contains_key(dep) {
                warnings.push(format!(
                    "Task '{}' depends on undefined task '{}'",
                    name, dep
                ));
            }
        }
    }

    if let Some(node) = first_cycle_node(cfg) {
        warnings.push(format!(
            "Circular dependency detected involving task: {}",
            node
        ));
    }

    warnings
}

fn first_cycle_node(cfg: &ProjectConfig) -> Option<String> {
    // Edge direction: dep -> task
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.tasks.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.tasks.iter() {
        for dep in task.depends_on.iter() {
            if cfg.tasks.contains_key(dep) {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => None,
        Err(cycle) => Some(cycle.node_id().to_string()),
    }
}
