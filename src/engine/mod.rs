//! engine
//!
//! Orchestrates a command invocation: Scan -> Analyze -> Report.
//!
//! # Architecture
//!
//! 1. **Scan**: Load configuration, the layer ruleset and every document,
//!    then build the composition graph ([`scan`])
//! 2. **Analyze**: Run validation or analytics over the snapshot
//!    ([`crate::core::verify`], [`crate::core::analytics`])
//! 3. **Report**: Render results or write the registry snapshot
//!    ([`crate::ui`], [`crate::core::registry`])
//!
//! # Invariants
//!
//! - The corpus is loaded once per invocation
//! - Analysis never mutates the snapshot
//! - The only file the tool writes is the registry snapshot

pub mod scan;

pub use scan::{scan, CorpusSnapshot, ScanError};

use std::path::PathBuf;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Corpus root override.
    pub root: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// The corpus root: the `--root` override or the working directory.
    pub fn corpus_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Scan the corpus this context points at.
    pub fn scan(&self) -> anyhow::Result<CorpusSnapshot> {
        use anyhow::Context as _;

        let root = self
            .corpus_root()
            .context("failed to determine corpus root")?;
        let snapshot = scan::scan(&root)
            .with_context(|| format!("failed to scan corpus at '{}'", root.display()))?;
        Ok(snapshot)
    }
}
