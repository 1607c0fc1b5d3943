// src/engine/mod.rs

//! Orchestration engine for taskweave.
//!
//! Ties together per invocation:
//! - target lookup and the clean-repository gate
//! - environment composition (once per run)
//! - dependency resolution into an execution plan
//! - fail-fast sequential execution through an `ExecutorBackend`

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

pub mod orchestrator;

pub use orchestrator::{plan, Orchestrator, RerunTask};
