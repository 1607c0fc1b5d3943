// src/snippets.rs

//! Reusable command fragments and `{snip:<name>}` expansion.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;

static SNIPPET_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{snip:([^}]+)\}").expect("snippet reference pattern is valid")
});

/// Read-only name -> text lookup backed by an external snippet store.
pub trait SnippetLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl SnippetLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl SnippetLookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Expand every `{snip:<name>}` reference in `command`.
///
/// One left-to-right pass: substituted text is inserted verbatim and is not
/// scanned again, so a snippet that itself contains `{snip:...}` keeps that
/// reference literally. Unknown references are left untouched.
pub fn expand(command: &str, snippets: &dyn SnippetLookup) -> String {
    SNIPPET_REF
        .replace_all(command, |caps: &Captures<'_>| match snippets.lookup(&caps[1]) {
            Some(text) => text,
            None => {
                debug!(snippet = %&caps[1], "unknown snippet reference left as-is");
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Snippet store loaded from a TOML file:
///
/// ```toml
/// [snippets]
/// greet = "hello world"
/// pytest-flags = "-q --maxfail=1"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetStore {
    #[serde(default)]
    snippets: BTreeMap<String, String>,
}

impl SnippetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Load snippets from `path`; a missing file yields an empty store.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.is_file(path) {
            debug!(?path, "no snippet file; using empty snippet store");
            return Ok(Self::default());
        }
        let contents = fs.read_to_string(path)?;
        let store: SnippetStore = toml::from_str(&contents)?;
        debug!(?path, count = store.len(), "loaded snippets");
        Ok(store)
    }
}

impl SnippetLookup for SnippetStore {
    fn lookup(&self, name: &str) -> Option<String> {
        self.snippets.get(name).cloned()
    }
}

/// `~/.taskweave/snippets.toml`, if a home directory is known.
pub fn default_snippet_path() -> Option<PathBuf> {
    let home = crate::exec::environment::home_dir(&crate::exec::environment::inherited());
    if home.is_none() {
        warn!("could not determine home directory; snippet store disabled");
    }
    home.map(|h| h.join(crate::exec::environment::STATE_DIR_NAME).join("snippets.toml"))
}
