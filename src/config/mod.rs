// src/config/mod.rs

//! Configuration loading and validation for taskweave.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load `taskweave.toml` from a project root (`loader.rs`).
//! - Report advisory warnings about the task graph (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_path, load_from_path, load_project_config, CONFIG_FILE_NAME};
pub use model::{ProjectConfig, ProjectMeta, TaskConfig};
pub use validate::validate_config;
