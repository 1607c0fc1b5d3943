// src/dag/resolver.rs

//! Execution plan computation.
//!
//! Depth-first traversal with three-colour marking, driven by an explicit
//! stack so pathological configurations cannot overflow the call stack.

use std::collections::HashMap;

use tracing::debug;

use crate::dag::graph::DagGraph;
use crate::engine::TaskName;
use crate::errors::{Result, TaskweaveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Compute the execution plan for `target`.
///
/// The returned order contains `target` and everything it transitively
/// depends on, each exactly once, with every dependency before its
/// dependents and `target` last. Dependencies are expanded in their
/// declared order, so a given graph always yields the same plan.
///
/// Errors:
/// - [`TaskweaveError::TaskNotFound`] if `target` or any referenced
///   dependency is missing from the graph.
/// - [`TaskweaveError::CyclicDependency`] naming the task that was revisited
///   while still in progress.
pub fn resolve(graph: &DagGraph, target: &str) -> Result<Vec<TaskName>> {
    if !graph.contains(target) {
        return Err(TaskweaveError::TaskNotFound(target.to_string()));
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order: Vec<TaskName> = Vec::new();
    // (task, index of the next dependency to expand)
    let mut stack: Vec<(&str, usize)> = vec![(target, 0)];
    marks.insert(target, Mark::InProgress);

    while let Some(&(name, next)) = stack.last() {
        let deps = graph.dependencies_of(name);

        let Some(dep) = deps.get(next) else {
            marks.insert(name, Mark::Done);
            order.push(name.to_string());
            stack.pop();
            continue;
        };

        if let Some(top) = stack.last_mut() {
            top.1 += 1;
        }

        match marks.get(dep.as_str()) {
            Some(Mark::Done) => {}
            Some(Mark::InProgress) => {
                return Err(TaskweaveError::CyclicDependency(dep.clone()));
            }
            None => {
                if !graph.contains(dep) {
                    return Err(TaskweaveError::TaskNotFound(dep.clone()));
                }
                marks.insert(dep.as_str(), Mark::InProgress);
                stack.push((dep.as_str(), 0));
            }
        }
    }

    debug!(target = %target, plan = ?order, "resolved execution plan");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> DagGraph {
        DagGraph::from_edges(edges.iter().map(|(n, d)| (*n, d.iter().copied())))
    }

    #[test]
    fn single_task_plan_is_itself() {
        let g = graph(&[("build", &[])]);
        assert_eq!(resolve(&g, "build").unwrap(), vec!["build"]);
    }

    #[test]
    fn diamond_visits_shared_dependency_once() {
        let g = graph(&[
            ("base", &[]),
            ("left", &["base"]),
            ("right", &["base"]),
            ("top", &["left", "right"]),
        ]);

        assert_eq!(
            resolve(&g, "top").unwrap(),
            vec!["base", "left", "right", "top"]
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let g = graph(&[("loop", &["loop"])]);
        match resolve(&g, "loop") {
            Err(TaskweaveError::CyclicDependency(name)) => assert_eq!(name, "loop"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn cycle_reports_revisited_task() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["b"])]);
        match resolve(&g, "a") {
            Err(TaskweaveError::CyclicDependency(name)) => assert_eq!(name, "b"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn missing_transitive_dependency_is_named() {
        let g = graph(&[("deploy", &["build"]), ("build", &["codegen"])]);
        match resolve(&g, "deploy") {
            Err(TaskweaveError::TaskNotFound(name)) => assert_eq!(name, "codegen"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_cycle_does_not_affect_target() {
        let g = graph(&[("ok", &[]), ("x", &["y"]), ("y", &["x"])]);
        assert_eq!(resolve(&g, "ok").unwrap(), vec!["ok"]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..50_000).map(|i| format!("t{i}")).collect();
        let g = DagGraph::from_edges(names.iter().enumerate().map(|(i, n)| {
            let deps: Vec<String> = if i == 0 { vec![] } else { vec![names[i - 1].clone()] };
            (n.clone(), deps)
        }));

        let plan = resolve(&g, "t49999").unwrap();
        assert_eq!(plan.len(), 50_000);
        assert_eq!(plan.first().map(String::as_str), Some("t0"));
    }
}
