//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$SKILLGRAPH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/skillgraph/config.toml`
//! 3. `~/.skillgraph/config.toml`
//!
//! # Corpus Config
//!
//! Located at `<root>/skillgraph.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing: counts must be positive and
//! names must be non-empty relative paths.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// top = 10
/// max_listed = 20
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Size of rankings in reports
    pub top: Option<usize>,

    /// Cap for long listings such as broken references
    pub max_listed: Option<usize>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_positive("top", self.top)?;
        validate_positive("max_listed", self.max_listed)
    }
}

/// Corpus configuration.
///
/// # Example
///
/// ```toml
/// references_dir = "references"
/// rules_file = "_layer-rules.json"
/// registry_file = "_compositions.json"
/// ignore_prefixes = ["_", "README"]
/// top = 5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    /// Directory holding skill documents, relative to the corpus root
    pub references_dir: Option<String>,

    /// Layer rules file, relative to the corpus root
    pub rules_file: Option<String>,

    /// Registry snapshot file, relative to the corpus root
    pub registry_file: Option<String>,

    /// File name prefixes skipped while loading
    pub ignore_prefixes: Option<Vec<String>>,

    /// Size of rankings in reports
    pub top: Option<usize>,

    /// Cap for long listings
    pub max_listed: Option<usize>,
}

impl CorpusConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("references_dir", &self.references_dir),
            ("rules_file", &self.rules_file),
            ("registry_file", &self.registry_file),
        ] {
            if let Some(value) = value {
                validate_relative(field, value)?;
            }
        }

        if let Some(prefixes) = &self.ignore_prefixes {
            if prefixes.iter().any(String::is_empty) {
                return Err(ConfigError::InvalidValue(
                    "ignore_prefixes cannot contain an empty prefix".to_string(),
                ));
            }
        }

        validate_positive("top", self.top)?;
        validate_positive("max_listed", self.max_listed)
    }
}

fn validate_positive(field: &str, value: Option<usize>) -> Result<(), ConfigError> {
    if value == Some(0) {
        return Err(ConfigError::InvalidValue(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

fn validate_relative(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue(format!("{field} cannot be empty")));
    }
    if std::path::Path::new(value).is_absolute() {
        return Err(ConfigError::InvalidValue(format!(
            "{field} must be relative to the corpus root, got '{value}'"
        )));
    }
    Ok(())
}
