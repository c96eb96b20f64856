//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! skillgraph has two configuration scopes:
//! - **Global**: User-level settings
//! - **Corpus**: Settings stored next to the documents
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Corpus config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SKILLGRAPH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/skillgraph/config.toml`
//! 3. `~/.skillgraph/config.toml`
//!
//! # Corpus Config Location
//!
//! `<root>/skillgraph.toml`. A legacy `<root>/.skillgraph.toml` is still
//! read, with a warning.
//!
//! # Example
//!
//! ```no_run
//! use skillgraph::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/docs/skills"))).unwrap();
//! let config = result.config;
//!
//! println!("Documents in: {}", config.references_dir());
//! println!("Top: {}", config.top());
//! ```

pub mod schema;

pub use schema::{CorpusConfig, GlobalConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::paths::{
    CorpusPaths, DEFAULT_REFERENCES_DIR, DEFAULT_REGISTRY_FILE, DEFAULT_RULES_FILE,
};

/// Default ranking size.
pub const DEFAULT_TOP: usize = 10;
/// Default cap for long listings.
pub const DEFAULT_MAX_LISTED: usize = 20;
/// File name prefixes skipped by default.
pub const DEFAULT_IGNORE_PREFIXES: [&str; 2] = ["_", "README"];

const LEGACY_CORPUS_CONFIG_FILE: &str = ".skillgraph.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: corpus config overrides global config,
/// which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Corpus configuration (if present)
    pub corpus: Option<CorpusConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the corpus config file (if loaded)
    corpus_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `corpus_root` is provided, also loads the corpus config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(corpus_root: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;

        let (corpus, corpus_path) = match corpus_root {
            Some(root) => Self::load_corpus(root, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref c) = corpus {
            c.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                corpus,
                global_path,
                corpus_path,
            },
            warnings,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        if let Ok(path) = std::env::var("SKILLGRAPH_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("skillgraph/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".skillgraph/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load the corpus configuration next to the documents.
    fn load_corpus(
        root: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<CorpusConfig>, Option<PathBuf>), ConfigError> {
        let canonical = CorpusPaths::config_path(root);
        if canonical.exists() {
            let config = Self::read_toml(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        let legacy = root.join(LEGACY_CORPUS_CONFIG_FILE);
        if legacy.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please rename to '{}'",
                    canonical.display()
                ),
                path: legacy.clone(),
            });
            let config = Self::read_toml(&legacy)?;
            return Ok((Some(config), Some(legacy)));
        }

        Ok((None, None))
    }

    /// Read and parse a TOML config file.
    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Directory holding skill documents.
    ///
    /// Defaults to "references".
    pub fn references_dir(&self) -> &str {
        self.corpus
            .as_ref()
            .and_then(|c| c.references_dir.as_deref())
            .unwrap_or(DEFAULT_REFERENCES_DIR)
    }

    /// Layer rules file name.
    ///
    /// Defaults to "_layer-rules.json".
    pub fn rules_file(&self) -> &str {
        self.corpus
            .as_ref()
            .and_then(|c| c.rules_file.as_deref())
            .unwrap_or(DEFAULT_RULES_FILE)
    }

    /// Registry snapshot file name.
    ///
    /// Defaults to "_compositions.json".
    pub fn registry_file(&self) -> &str {
        self.corpus
            .as_ref()
            .and_then(|c| c.registry_file.as_deref())
            .unwrap_or(DEFAULT_REGISTRY_FILE)
    }

    /// File name prefixes skipped while loading.
    ///
    /// Defaults to `["_", "README"]`.
    pub fn ignore_prefixes(&self) -> Vec<String> {
        self.corpus
            .as_ref()
            .and_then(|c| c.ignore_prefixes.clone())
            .unwrap_or_else(|| DEFAULT_IGNORE_PREFIXES.map(String::from).to_vec())
    }

    /// Ranking size.
    ///
    /// Defaults to 10.
    pub fn top(&self) -> usize {
        self.corpus
            .as_ref()
            .and_then(|c| c.top)
            .or(self.global.top)
            .unwrap_or(DEFAULT_TOP)
    }

    /// Cap for long listings.
    ///
    /// Defaults to 20.
    pub fn max_listed(&self) -> usize {
        self.corpus
            .as_ref()
            .and_then(|c| c.max_listed)
            .or(self.global.max_listed)
            .unwrap_or(DEFAULT_MAX_LISTED)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded corpus config file.
    pub fn corpus_config_loaded_from(&self) -> Option<&Path> {
        self.corpus_path.as_deref()
    }
}
