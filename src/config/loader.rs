// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::ProjectConfig;
use crate::errors::{Result, TaskweaveError};
use crate::fs::FileSystem;

/// File name of the per-project configuration document.
pub const CONFIG_FILE_NAME: &str = "taskweave.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; dependency problems are left to
/// the resolver (hard errors at run time) and [`validate_config`] (advisory
/// warnings).
///
/// [`validate_config`]: crate::config::validate::validate_config
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;

    let config: ProjectConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load `taskweave.toml` from a project root.
///
/// A missing file is a runner error rather than an IO error: the caller
/// pointed us at a project that has no task configuration.
pub fn load_project_config(fs: &dyn FileSystem, root: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = config_path(root);
    if !fs.is_file(&path) {
        return Err(TaskweaveError::Runner(format!(
            "No {} found in {}",
            CONFIG_FILE_NAME,
            path.parent().unwrap_or(&path).display()
        )));
    }
    load_from_path(fs, &path)
}

pub fn config_path(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(CONFIG_FILE_NAME)
}
