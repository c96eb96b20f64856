//! engine::scan
//!
//! Corpus scanning: everything a command reads, loaded once.
//!
//! # Architecture
//!
//! The scanner produces a `CorpusSnapshot` containing:
//! - Global and corpus configuration
//! - The layer ruleset (file or built-in)
//! - Every loaded skill document
//! - The composition graph derived from their metadata
//!
//! # Invariants
//!
//! - Scan is read-only; it never writes inside the corpus
//! - Scan is deterministic given the same files on disk
//! - Any load failure aborts the scan; there is no partial snapshot

use std::path::Path;

use thiserror::Error;

use crate::core::config::{Config, ConfigError, ConfigWarning};
use crate::core::graph::CompositionGraph;
use crate::core::paths::CorpusPaths;
use crate::core::rules::{LayerRuleset, RulesError, RulesSource};
use crate::corpus::{Corpus, CorpusError, LoadOptions};

/// Errors from scanning operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Failed to load config.
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    /// Failed to load the layer rules.
    #[error("failed to load layer rules: {0}")]
    Rules(#[from] RulesError),

    /// Failed to load the documents.
    #[error("failed to load corpus: {0}")]
    Corpus(#[from] CorpusError),
}

/// Everything loaded for one invocation.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    /// Merged configuration
    pub config: Config,
    /// Warnings from config loading
    pub config_warnings: Vec<ConfigWarning>,
    /// Resolved corpus locations
    pub paths: CorpusPaths,
    /// Layer ruleset
    pub rules: LayerRuleset,
    /// Where the ruleset came from
    pub rules_source: RulesSource,
    /// Loaded documents
    pub corpus: Corpus,
    /// Composition graph of the loaded documents
    pub graph: CompositionGraph,
}

/// Scan the corpus rooted at `root`.
///
/// # Errors
///
/// Returns an error if configuration, rules or any document cannot be
/// loaded.
pub fn scan(root: &Path) -> Result<CorpusSnapshot, ScanError> {
    let loaded = Config::load(Some(root))?;
    let config = loaded.config;
    tracing::debug!(
        global = ?config.global_config_loaded_from(),
        corpus = ?config.corpus_config_loaded_from(),
        "configuration loaded"
    );
    let paths = CorpusPaths::from_config(root.to_path_buf(), &config);

    let (rules, rules_source) = LayerRuleset::load_or_builtin(&paths.rules_path())?;
    tracing::debug!(source = ?rules_source, layers = rules.layers().count(), "layer rules loaded");

    let options = LoadOptions {
        ignore_prefixes: config.ignore_prefixes(),
    };
    let corpus = Corpus::load(&paths.references_dir(), &options)?;
    let graph = CompositionGraph::build(&corpus.documents, &rules);

    Ok(CorpusSnapshot {
        config,
        config_warnings: loaded.warnings,
        paths,
        rules,
        rules_source,
        corpus,
        graph,
    })
}
