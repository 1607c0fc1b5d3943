use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variables handed to a task process.
///
/// Composition works on an explicit value rather than the live process
/// environment, so it can be built and inspected without side effects.
pub type EnvMap = BTreeMap<String, String>;

/// Project binding as supplied by the external registry.
///
/// Read-only to the orchestrator: it only needs the root (working directory,
/// config location, ignore file) and the optional isolated-tooling root
/// (e.g. a project-local virtualenv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
    pub tooling: Option<PathBuf>,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            tooling: None,
        }
    }

    pub fn with_tooling(mut self, tooling: impl Into<PathBuf>) -> Self {
        self.tooling = Some(tooling.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tooling(&self) -> Option<&Path> {
        self.tooling.as_deref()
    }
}
