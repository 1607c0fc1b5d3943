// src/watch/ignore.rs

//! Ignore rules for watch mode.
//!
//! The effective rule set is the built-in patterns plus the project's ignore
//! file. It is compiled once per watch session and never changes afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;

/// Ignore file read from the project root.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Always ignored: VCS metadata, isolated tooling dirs, bytecode, editor swap
/// files and OS metadata.
pub const BUILTIN_IGNORES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".venv",
    "venv",
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.swp",
    "*.swo",
    "*~",
    ".DS_Store",
    "Thumbs.db",
];

/// One ignore-file line, split into its glob and gitignore flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern {
    /// Glob without leading or trailing `/`.
    pub glob: String,
    /// Leading `/` or an inner `/`: matched against root-relative paths only.
    pub anchored: bool,
    /// Trailing `/`: matches directories (and everything below them) only.
    pub dir_only: bool,
}

impl IgnorePattern {
    /// Parse a gitignore-style line. Returns `None` for a bare `/`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let dir_only = line.ends_with('/');
        let body = line.trim_end_matches('/');
        let anchored = body.contains('/');
        let glob = body.trim_start_matches('/');
        if glob.is_empty() {
            return None;
        }
        Some(Self {
            glob: glob.to_string(),
            anchored,
            dir_only,
        })
    }
}

/// Patterns of one kind compiled together, with their `dir_only` flags by
/// glob index.
#[derive(Clone)]
struct FlaggedSet {
    set: GlobSet,
    dir_only: Vec<bool>,
}

impl FlaggedSet {
    fn build(patterns: &[&IgnorePattern], literal_separator: bool) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut dir_only = Vec::with_capacity(patterns.len());
        for pat in patterns {
            let glob = GlobBuilder::new(&pat.glob)
                .literal_separator(literal_separator)
                .build()
                .with_context(|| format!("invalid ignore glob: {}", pat.glob))?;
            builder.add(glob);
            dir_only.push(pat.dir_only);
        }
        Ok(Self {
            set: builder.build().context("building ignore globset")?,
            dir_only,
        })
    }

    fn matches(&self, candidate: &str, is_dir: bool) -> bool {
        self.set
            .matches(candidate)
            .into_iter()
            .any(|idx| is_dir || !self.dir_only[idx])
    }
}

/// Compiled ignore patterns.
///
/// Follows gitignore matching for the supported subset:
/// - patterns without a `/` match a path component at any depth, so
///   `__pycache__` also covers everything below such a directory;
/// - anchored patterns (`/dist`, `docs/*.md`) match root-relative paths, and
///   `*` does not cross `/` in them;
/// - directory-only patterns (`build/`) never match a plain file of that
///   name, only a directory and its contents.
#[derive(Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    patterns: Vec<String>,
    names: FlaggedSet,
    anchored: FlaggedSet,
}

impl fmt::Debug for IgnoreRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRules")
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl IgnoreRules {
    /// Built-in patterns plus gitignore-style `extra` lines. Invalid extra
    /// patterns are skipped.
    pub fn new<I, S>(root: impl Into<PathBuf>, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed: Vec<IgnorePattern> = Vec::new();
        let mut patterns = Vec::new();

        for pat in BUILTIN_IGNORES {
            let parsed_pat = IgnorePattern::parse(pat)
                .ok_or_else(|| anyhow::anyhow!("empty built-in glob"))?;
            Glob::new(&parsed_pat.glob).with_context(|| format!("invalid built-in glob: {pat}"))?;
            parsed.push(parsed_pat);
            patterns.push(pat.to_string());
        }

        for line in extra {
            let line = line.into();
            let Some(pat) = IgnorePattern::parse(&line) else {
                continue;
            };
            match Glob::new(&pat.glob) {
                Ok(_) => {
                    parsed.push(pat);
                    patterns.push(line);
                }
                Err(err) => warn!(pattern = %line, error = %err, "skipping invalid ignore pattern"),
            }
        }

        let (anchored, names): (Vec<&IgnorePattern>, Vec<&IgnorePattern>) =
            parsed.iter().partition(|p| p.anchored);

        Ok(Self {
            root: root.into(),
            patterns,
            names: FlaggedSet::build(&names, false)?,
            anchored: FlaggedSet::build(&anchored, true)?,
        })
    }

    /// Built-in patterns plus `<root>/.gitignore`, if present.
    pub fn load(fs: &dyn FileSystem, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let ignore_file = root.join(IGNORE_FILE_NAME);

        let extra = if fs.is_file(&ignore_file) {
            match fs.read_to_string(&ignore_file) {
                Ok(contents) => parse_ignore_file(&contents),
                Err(err) => {
                    warn!(file = ?ignore_file, error = %err, "could not read ignore file");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        debug!(count = extra.len(), "loaded ignore-file patterns");
        Self::new(root, extra)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// `true` if `path` or any directory above it (up to the root) matches.
    ///
    /// Every component but the last is a directory; the last one counts as a
    /// directory only if it exists as one.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let rel = relative_str(&self.root, path)
            .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"));
        let components: Vec<&str> = rel.split('/').filter(|c| !c.is_empty()).collect();
        let last = components.len().saturating_sub(1);

        let mut prefix = String::with_capacity(rel.len());
        for (idx, component) in components.iter().enumerate() {
            if idx > 0 {
                prefix.push('/');
            }
            prefix.push_str(component);

            let is_dir = idx < last || path.is_dir();
            if self.names.matches(component, is_dir) || self.anchored.matches(&prefix, is_dir) {
                return true;
            }
        }
        false
    }
}

/// Parse an ignore file: one pattern per line, blank lines and `#` comments
/// skipped.
///
/// Lines are returned trimmed but otherwise as written; their leading and
/// trailing `/` are interpreted by [`IgnorePattern::parse`]. Negated `!`
/// patterns cannot be expressed in a union of ignore rules and are skipped.
pub fn parse_ignore_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            if line.starts_with('!') {
                debug!(pattern = %line, "negated ignore pattern not supported; skipping");
                return None;
            }
            IgnorePattern::parse(line).map(|_| line.to_string())
        })
        .collect()
}
