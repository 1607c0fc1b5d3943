// src/dag/mod.rs

//! Task graph representation and dependency resolution.
//!
//! - [`graph`] holds the task graph exactly as configured (dangling
//!   references and cycles included).
//! - [`resolver`] turns a target task into an execution plan.

pub mod graph;
pub mod resolver;

pub use graph::DagGraph;
pub use resolver::resolve;
