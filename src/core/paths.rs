//! core::paths
//!
//! Centralized path routing for corpus locations.
//!
//! # Layout
//!
//! A corpus root holds:
//! - `references/` - skill documents, one directory per layer
//! - `_layer-rules.json` - layer ruleset (optional)
//! - `_compositions.json` - registry snapshot (generated)
//! - `skillgraph.toml` - corpus configuration (optional)
//!
//! The three data locations can be renamed through the corpus
//! configuration; no other module joins these names onto the root.
//!
//! # Example
//!
//! ```
//! use skillgraph::core::paths::CorpusPaths;
//! use std::path::PathBuf;
//!
//! let paths = CorpusPaths::new(PathBuf::from("/docs/skills"));
//! assert_eq!(paths.references_dir(), PathBuf::from("/docs/skills/references"));
//! assert_eq!(paths.registry_path(), PathBuf::from("/docs/skills/_compositions.json"));
//! ```

use std::path::{Component, Path, PathBuf};

use super::config::Config;

/// Default directory holding skill documents.
pub const DEFAULT_REFERENCES_DIR: &str = "references";
/// Default layer rules file name.
pub const DEFAULT_RULES_FILE: &str = "_layer-rules.json";
/// Default registry snapshot file name.
pub const DEFAULT_REGISTRY_FILE: &str = "_compositions.json";
/// Corpus configuration file name.
pub const CORPUS_CONFIG_FILE: &str = "skillgraph.toml";

/// Locations of everything the tool reads or writes for one corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    /// Corpus root directory
    pub root: PathBuf,
    references_dir: String,
    rules_file: String,
    registry_file: String,
}

impl CorpusPaths {
    /// Paths with default names under `root`.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            references_dir: DEFAULT_REFERENCES_DIR.to_string(),
            rules_file: DEFAULT_RULES_FILE.to_string(),
            registry_file: DEFAULT_REGISTRY_FILE.to_string(),
        }
    }

    /// Paths with names taken from the merged configuration.
    pub fn from_config(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            references_dir: config.references_dir().to_string(),
            rules_file: config.rules_file().to_string(),
            registry_file: config.registry_file().to_string(),
        }
    }

    /// Directory holding skill documents.
    pub fn references_dir(&self) -> PathBuf {
        self.root.join(&self.references_dir)
    }

    /// Layer rules file.
    pub fn rules_path(&self) -> PathBuf {
        self.root.join(&self.rules_file)
    }

    /// Registry snapshot file.
    pub fn registry_path(&self) -> PathBuf {
        self.root.join(&self.registry_file)
    }

    /// Corpus configuration file.
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CORPUS_CONFIG_FILE)
    }
}

/// Lexically normalize a path, resolving `.` and `..` without touching the
/// filesystem.
///
/// ```
/// use skillgraph::core::paths::normalize;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     normalize(Path::new("refs/molecules/../atoms/./button.md")),
///     PathBuf::from("refs/atoms/button.md")
/// );
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `path` relative to `base` for display, with `/` separators.
pub fn display_relative(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    let s = rel.to_string_lossy().to_string();
    if std::path::MAIN_SEPARATOR != '/' {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    } else {
        s
    }
}
