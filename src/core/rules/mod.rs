//! core::rules
//!
//! The layer ruleset: per-layer identity and composition rules.
//!
//! # Overview
//!
//! Each layer rank has a directory, an id prefix, the layers it may compose
//! from, an optional minimum composition count and a category allow-list.
//! Corpus-wide parameters add formula requirements and per-layer section
//! exemptions.
//!
//! The ruleset is loaded once per invocation and never mutated. Every
//! component that needs it takes `&LayerRuleset` explicitly.
//!
//! # Sources
//!
//! 1. `_layer-rules.json` at the corpus root (see [`schema`])
//! 2. [`LayerRuleset::builtin`] when no rules file exists
//!
//! # Example
//!
//! ```
//! use skillgraph::core::rules::LayerRuleset;
//! use skillgraph::core::types::Layer;
//!
//! let rules = LayerRuleset::builtin();
//! let resolved = rules.resolve("../atoms/button.md").unwrap();
//!
//! assert_eq!(resolved.id.as_str(), "a-button");
//! assert_eq!(resolved.layer, Layer::new(1));
//! assert_eq!(rules.lowest(), Some(Layer::new(0)));
//! assert_eq!(rules.highest(), Some(Layer::new(6)));
//! ```

pub mod schema;

pub use schema::{FormulaRules, LayerEntry, LayerRulesFile, ValidationSection};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use super::types::{CompositionRef, Layer, SkillId};

/// Errors from loading or validating a rules file.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse rules file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid layer rules: {0}")]
    InvalidValue(String),

    #[error("invalid formula pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Where the active ruleset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// Loaded from this file
    File(PathBuf),
    /// No rules file; built-in defaults
    Builtin,
}

/// Validated rules for a single layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRule {
    pub layer: Layer,
    pub name: String,
    pub directory: String,
    pub id_prefix: String,
    /// Informational; enforcement compares ranks.
    pub can_compose: Vec<Layer>,
    /// Set only when the layer must compose.
    pub min_compositions: Option<usize>,
    /// Empty means any category is accepted.
    pub categories: Vec<String>,
    pub section_exemptions: Vec<String>,
    pub formula_required: bool,
}

impl LayerRule {
    /// Whether `section` (a title without `## `) is exempt for this layer.
    pub fn is_exempt(&self, section: &str) -> bool {
        self.section_exemptions.iter().any(|s| s == section)
    }
}

/// A composition reference resolved through the ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Layer owning the referenced directory
    pub layer: Layer,
    /// Prefix + basename
    pub id: SkillId,
}

/// The complete, validated ruleset.
#[derive(Debug, Clone)]
pub struct LayerRuleset {
    rules: BTreeMap<Layer, LayerRule>,
    by_directory: HashMap<String, Layer>,
    formula_pattern: Option<Regex>,
}

impl LayerRuleset {
    /// Load the rules file at `path`, or the built-in rules if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_or_builtin(path: &Path) -> Result<(Self, RulesSource), RulesError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rules file, using built-in layers");
            return Ok((Self::builtin(), RulesSource::Builtin));
        }
        let rules = Self::load(path)?;
        Ok((rules, RulesSource::File(path.to_path_buf())))
    }

    /// Load and validate a rules file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let contents = fs::read_to_string(path).map_err(|e| RulesError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: LayerRulesFile =
            serde_json::from_str(&contents).map_err(|e| RulesError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_schema(file)
    }

    /// Validate a parsed rules document and build the ruleset.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::InvalidValue` when layer keys are malformed,
    /// prefixes or directories are empty or duplicated, `canCompose` or
    /// `formulaRules.required` name unknown layers, or a layer lists one at
    /// or above its own rank as composable. Returns
    /// `RulesError::InvalidPattern` when the formula pattern does not
    /// compile.
    pub fn from_schema(file: LayerRulesFile) -> Result<Self, RulesError> {
        if file.layers.is_empty() {
            return Err(RulesError::InvalidValue("no layers defined".into()));
        }

        let mut ranks = BTreeMap::new();
        for key in file.layers.keys() {
            let layer: Layer = key
                .parse()
                .map_err(|e| RulesError::InvalidValue(format!("layer key '{key}': {e}")))?;
            ranks.insert(key.clone(), layer);
        }

        let parse_known = |name: &str, context: &str| -> Result<Layer, RulesError> {
            ranks.get(name).copied().ok_or_else(|| {
                RulesError::InvalidValue(format!("{context} references unknown layer '{name}'"))
            })
        };

        let formula = file.validation.formula_rules.unwrap_or_default();
        let mut formula_layers = Vec::new();
        for name in &formula.required {
            formula_layers.push(parse_known(name, "formulaRules.required")?);
        }

        let mut rules = BTreeMap::new();
        let mut by_directory = HashMap::new();
        let mut prefixes: HashMap<String, Layer> = HashMap::new();

        for (key, entry) in file.layers {
            let layer = ranks[&key];

            if entry.id_prefix.is_empty() {
                return Err(RulesError::InvalidValue(format!("{key}: idPrefix is empty")));
            }
            if entry.directory.is_empty() {
                return Err(RulesError::InvalidValue(format!("{key}: directory is empty")));
            }
            if let Some(other) = prefixes.insert(entry.id_prefix.clone(), layer) {
                return Err(RulesError::InvalidValue(format!(
                    "{key}: idPrefix '{}' already used by {other}",
                    entry.id_prefix
                )));
            }
            if let Some(other) = by_directory.insert(entry.directory.clone(), layer) {
                return Err(RulesError::InvalidValue(format!(
                    "{key}: directory '{}' already used by {other}",
                    entry.directory
                )));
            }

            let mut can_compose = Vec::new();
            for name in &entry.can_compose {
                let target = parse_known(name, &format!("{key}.canCompose"))?;
                if target >= layer {
                    return Err(RulesError::InvalidValue(format!(
                        "{key}.canCompose lists {target}, which is not below {layer}"
                    )));
                }
                can_compose.push(target);
            }

            let section_exemptions = file
                .validation
                .section_exemptions
                .get(&key)
                .cloned()
                .unwrap_or_default();

            rules.insert(
                layer,
                LayerRule {
                    layer,
                    name: entry.name,
                    directory: entry.directory,
                    id_prefix: entry.id_prefix,
                    can_compose,
                    min_compositions: entry.min_compositions.filter(|_| entry.must_compose),
                    categories: entry.categories,
                    section_exemptions,
                    formula_required: formula_layers.contains(&layer),
                },
            );
        }

        let formula_pattern = formula
            .pattern
            .map(|p| {
                Regex::new(&p).map_err(|e| RulesError::InvalidPattern {
                    pattern: p.clone(),
                    source: e,
                })
            })
            .transpose()?;

        Ok(Self {
            rules,
            by_directory,
            formula_pattern,
        })
    }

    /// The built-in seven-layer ruleset.
    ///
    /// Categories are unrestricted, no layer has a composition minimum,
    /// and formulas are required from L2 upward without a format pattern.
    pub fn builtin() -> Self {
        const LAYERS: [(&str, &str, &str); 7] = [
            ("Primitives", "primitives", "p-"),
            ("Atoms", "atoms", "a-"),
            ("Molecules", "molecules", "m-"),
            ("Organisms", "organisms", "o-"),
            ("Templates", "templates", "t-"),
            ("Patterns", "patterns", "pt-"),
            ("Recipes", "recipes", "r-"),
        ];

        let mut rules = BTreeMap::new();
        let mut by_directory = HashMap::new();

        for (rank, (name, directory, prefix)) in (0u8..).zip(LAYERS) {
            let layer = Layer::new(rank);
            by_directory.insert(directory.to_string(), layer);
            rules.insert(
                layer,
                LayerRule {
                    layer,
                    name: name.to_string(),
                    directory: directory.to_string(),
                    id_prefix: prefix.to_string(),
                    can_compose: (0..rank).map(Layer::new).collect(),
                    min_compositions: None,
                    categories: Vec::new(),
                    section_exemptions: Vec::new(),
                    formula_required: rank >= 2,
                },
            );
        }

        Self {
            rules,
            by_directory,
            formula_pattern: None,
        }
    }

    /// Rules for a layer, if it is part of the ruleset.
    pub fn get(&self, layer: Layer) -> Option<&LayerRule> {
        self.rules.get(&layer)
    }

    /// Rules for a declared layer string (`"L2"`), if recognized.
    pub fn get_declared(&self, declared: &str) -> Option<&LayerRule> {
        declared.parse().ok().and_then(|layer| self.get(layer))
    }

    /// The layer whose documents live in `directory`.
    pub fn layer_for_directory(&self, directory: &str) -> Option<&LayerRule> {
        self.by_directory
            .get(directory)
            .and_then(|layer| self.rules.get(layer))
    }

    /// Resolve a `../<dir>/<basename>.md` reference to a target id.
    ///
    /// Purely syntactic: the target document does not have to exist.
    /// Returns `None` for other shapes or unknown directories.
    pub fn resolve(&self, reference: &str) -> Option<ResolvedRef> {
        let parsed = CompositionRef::parse(reference).ok()?;
        let rule = self.layer_for_directory(parsed.directory())?;
        let id = SkillId::from_parts(&rule.id_prefix, parsed.basename()).ok()?;
        Some(ResolvedRef {
            layer: rule.layer,
            id,
        })
    }

    /// All layer rules, lowest rank first.
    pub fn layers(&self) -> impl Iterator<Item = &LayerRule> {
        self.rules.values()
    }

    /// Lowest configured rank.
    pub fn lowest(&self) -> Option<Layer> {
        self.rules.keys().next().copied()
    }

    /// Highest configured rank.
    pub fn highest(&self) -> Option<Layer> {
        self.rules.keys().next_back().copied()
    }

    /// Human-readable rank range, e.g. `L0-L6`.
    pub fn range_label(&self) -> String {
        match (self.lowest(), self.highest()) {
            (Some(lo), Some(hi)) if lo != hi => format!("{lo}-{hi}"),
            (Some(lo), _) => lo.to_string(),
            _ => String::new(),
        }
    }

    /// Pattern every formula must match, when configured.
    pub fn formula_pattern(&self) -> Option<&Regex> {
        self.formula_pattern.as_ref()
    }
}
