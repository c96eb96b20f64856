//! core::rules::schema
//!
//! On-disk schema of the layer rules file (`_layer-rules.json`).
//!
//! # Example
//!
//! ```json
//! {
//!   "layers": {
//!     "L1": {
//!       "name": "Atoms",
//!       "directory": "atoms",
//!       "idPrefix": "a-",
//!       "canCompose": ["L0"],
//!       "categories": ["interactive", "display"]
//!     },
//!     "L2": {
//!       "name": "Molecules",
//!       "directory": "molecules",
//!       "idPrefix": "m-",
//!       "canCompose": ["L0", "L1"],
//!       "mustCompose": true,
//!       "minCompositions": 2,
//!       "categories": ["forms", "navigation"]
//!     }
//!   },
//!   "validation": {
//!     "formulaRules": { "pattern": "^[A-Z]", "required": ["L2"] },
//!     "sectionExemptions": { "L2": ["Composition Diagram"] }
//!   }
//! }
//! ```
//!
//! Unknown keys are ignored; the file is shared with other tooling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level rules document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerRulesFile {
    /// Per-layer rules keyed by `L<n>`
    pub layers: BTreeMap<String, LayerEntry>,

    /// Corpus-wide validation parameters
    #[serde(default)]
    pub validation: ValidationSection,
}

/// Rules for one layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
    /// Display name (e.g. "Atoms")
    pub name: String,

    /// Directory holding this layer's documents
    pub directory: String,

    /// Prefix every id in this layer must start with
    pub id_prefix: String,

    /// Layers this one may compose from (informational)
    #[serde(default)]
    pub can_compose: Vec<String>,

    /// Whether documents must compose at least `min_compositions` others
    #[serde(default)]
    pub must_compose: bool,

    /// Minimum composition count when `must_compose` is set
    #[serde(default)]
    pub min_compositions: Option<usize>,

    /// Allowed categories (empty means unrestricted)
    #[serde(default)]
    pub categories: Vec<String>,
}

/// The `validation` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSection {
    /// Formula requirements
    #[serde(default)]
    pub formula_rules: Option<FormulaRules>,

    /// Sections each layer is exempt from, by section title
    #[serde(default)]
    pub section_exemptions: BTreeMap<String, Vec<String>>,
}

/// Formula requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormulaRules {
    /// Regex every formula must match
    #[serde(default)]
    pub pattern: Option<String>,

    /// Layers that must declare a formula
    #[serde(default)]
    pub required: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_keys() {
        let json = r#"{
            "layers": {
                "L2": {
                    "name": "Molecules",
                    "directory": "molecules",
                    "idPrefix": "m-",
                    "canCompose": ["L0", "L1"],
                    "mustCompose": true,
                    "minCompositions": 2,
                    "categories": ["forms"]
                }
            },
            "validation": {
                "formulaRules": { "pattern": "^[A-Z]", "required": ["L2"] },
                "sectionExemptions": { "L2": ["Composition Diagram"] }
            }
        }"#;

        let file: LayerRulesFile = serde_json::from_str(json).unwrap();
        let l2 = &file.layers["L2"];
        assert_eq!(l2.id_prefix, "m-");
        assert!(l2.must_compose);
        assert_eq!(l2.min_compositions, Some(2));

        let formula = file.validation.formula_rules.unwrap();
        assert_eq!(formula.required, vec!["L2"]);
        assert_eq!(
            file.validation.section_exemptions["L2"],
            vec!["Composition Diagram"]
        );
    }

    #[test]
    fn optional_sections_default() {
        let json = r#"{
            "layers": {
                "L0": { "name": "Primitives", "directory": "primitives", "idPrefix": "p-" }
            },
            "$schema": "ignored"
        }"#;

        let file: LayerRulesFile = serde_json::from_str(json).unwrap();
        let l0 = &file.layers["L0"];
        assert!(l0.can_compose.is_empty());
        assert!(!l0.must_compose);
        assert!(l0.categories.is_empty());
        assert!(file.validation.formula_rules.is_none());
    }
}
