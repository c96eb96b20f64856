//! core::metadata
//!
//! Skill frontmatter schema and parsing.
//!
//! # Format
//!
//! Every skill document starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! id: m-search-bar
//! name: Search Bar
//! version: 1.0.0
//! layer: L2
//! category: forms
//! description: Text input with a submit button
//! tags: [search, forms]
//! composes:
//!   - ../atoms/input.md
//!   - ../atoms/button.md
//! formula: "SearchBar = Input(a-input) + Button(a-button)"
//! ---
//! ## Overview
//! ...
//! ```
//!
//! # Parsing
//!
//! Fields are typed but optional; presence rules are a validator concern.
//! Scalars are accepted as strings, numbers or booleans so `version: 1.0`
//! is reported as a bad version rather than as unparseable frontmatter.
//! Keys outside the schema are kept in [`SkillMetadata::extra`].
//!
//! A block that is missing or fails to parse yields no metadata at all;
//! the document is then unusable to the graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml_ng::Value;

use super::types::{Layer, SkillId};

/// Parsed frontmatter of one skill document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMetadata {
    /// Corpus-unique identifier
    #[serde(deserialize_with = "scalar")]
    pub id: Option<String>,

    /// Display name
    #[serde(deserialize_with = "scalar")]
    pub name: Option<String>,

    /// Semantic version of the document
    #[serde(deserialize_with = "scalar")]
    pub version: Option<String>,

    /// Declared layer (`L0`..`L6`)
    #[serde(deserialize_with = "scalar")]
    pub layer: Option<String>,

    /// Category within the layer
    #[serde(deserialize_with = "scalar")]
    pub category: Option<String>,

    /// One-line description
    #[serde(deserialize_with = "scalar")]
    pub description: Option<String>,

    /// Free-form tags
    #[serde(deserialize_with = "scalar_list")]
    pub tags: Option<Vec<String>>,

    /// Relative paths of composed documents
    #[serde(deserialize_with = "scalar_list")]
    pub composes: Option<Vec<String>>,

    /// Formula mirroring `composes`
    #[serde(deserialize_with = "scalar")]
    pub formula: Option<String>,

    /// Fields outside the core schema (dependencies, performance, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SkillMetadata {
    /// The validated identifier, if one is declared.
    pub fn skill_id(&self) -> Option<SkillId> {
        self.id.as_deref().and_then(|id| SkillId::new(id).ok())
    }

    /// The declared layer parsed as a rank, if well-formed.
    pub fn layer_rank(&self) -> Option<Layer> {
        self.layer.as_deref().and_then(|l| l.parse().ok())
    }

    /// Declared composition references (empty when absent).
    pub fn composes(&self) -> &[String] {
        self.composes.as_deref().unwrap_or_default()
    }

    /// Declared tags (empty when absent).
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// The formula, if present and non-empty.
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref().filter(|f| !f.is_empty())
    }
}

/// A document split into its metadata block and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Parsed metadata (`None` when missing or malformed)
    pub metadata: Option<SkillMetadata>,
    /// Text after the closing fence (the whole content when no block)
    pub body: String,
}

/// Split `content` at the frontmatter fences.
///
/// Returns `(yaml, body)` or `None` when the content does not start with a
/// complete `---` block.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---\n")?;

    if let Some(end) = rest.find("\n---\n") {
        return Some((&rest[..end], &rest[end + 5..]));
    }
    rest.strip_suffix("\n---").map(|yaml| (yaml, ""))
}

/// Parse a document into metadata and body.
///
/// Line endings are normalized to `\n` first.
///
/// # Example
///
/// ```
/// use skillgraph::core::metadata::parse_document;
///
/// let doc = parse_document("---\nid: a-button\nlayer: L1\n---\n## Overview\n");
/// let meta = doc.metadata.unwrap();
/// assert_eq!(meta.id.as_deref(), Some("a-button"));
/// assert_eq!(doc.body, "## Overview\n");
///
/// assert!(parse_document("no frontmatter").metadata.is_none());
/// ```
pub fn parse_document(content: &str) -> ParsedDocument {
    let normalized = content.replace("\r\n", "\n");

    let Some((yaml, body)) = split_frontmatter(&normalized) else {
        return ParsedDocument {
            metadata: None,
            body: normalized,
        };
    };

    match serde_yaml_ng::from_str::<SkillMetadata>(yaml) {
        Ok(metadata) => ParsedDocument {
            metadata: Some(metadata),
            body: body.to_string(),
        },
        Err(e) => {
            tracing::debug!(error = %e, "frontmatter failed to parse");
            ParsedDocument {
                metadata: None,
                body: normalized,
            }
        }
    }
}

fn scalar_to_string(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err("expected a scalar value".to_string()),
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) => scalar_to_string(v).map_err(serde::de::Error::custom),
    }
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(s) = scalar_to_string(item).map_err(serde::de::Error::custom)? {
                    out.push(s);
                }
            }
            Ok(Some(out))
        }
        Some(_) => Err(serde::de::Error::custom("expected a list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "---
id: m-search-bar
name: Search Bar
version: 1.2.0
layer: L2
category: forms
description: Text input with a submit button
tags: [search, forms]
composes:
  - ../atoms/input.md
  - ../atoms/button.md
formula: \"SearchBar = Input(a-input) + Button(a-button)\"
complexity: low
performance:
  impact: minimal
---
## Overview

Body text.
";

    #[test]
    fn parses_all_fields() {
        let doc = parse_document(FULL);
        let meta = doc.metadata.expect("metadata");

        assert_eq!(meta.id.as_deref(), Some("m-search-bar"));
        assert_eq!(meta.layer_rank(), Some(Layer::new(2)));
        assert_eq!(meta.tags(), ["search", "forms"]);
        assert_eq!(meta.composes().len(), 2);
        assert_eq!(
            meta.formula(),
            Some("SearchBar = Input(a-input) + Button(a-button)")
        );
        assert!(meta.extra.contains_key("complexity"));
        assert!(meta.extra.contains_key("performance"));
        assert!(doc.body.starts_with("## Overview"));
    }

    #[test]
    fn numeric_scalars_become_strings() {
        let doc = parse_document("---\nid: a-x\nversion: 2\ntags: [1, beta]\n---\n");
        let meta = doc.metadata.unwrap();
        assert_eq!(meta.version.as_deref(), Some("2"));
        assert_eq!(meta.tags(), ["1", "beta"]);
    }

    #[test]
    fn empty_composes_is_none() {
        let doc = parse_document("---\nid: p-colors\ncomposes:\n---\n");
        let meta = doc.metadata.unwrap();
        assert!(meta.composes.is_none());
        assert!(meta.composes().is_empty());
    }

    #[test]
    fn missing_fence_has_no_metadata() {
        let doc = parse_document("# Title\n\nid: a-x\n");
        assert!(doc.metadata.is_none());
        assert_eq!(doc.body, "# Title\n\nid: a-x\n");
    }

    #[test]
    fn unterminated_block_has_no_metadata() {
        assert!(parse_document("---\nid: a-x\n").metadata.is_none());
    }

    #[test]
    fn malformed_yaml_has_no_metadata() {
        let doc = parse_document("---\nid: [unclosed\n---\nbody\n");
        assert!(doc.metadata.is_none());
    }

    #[test]
    fn structured_value_in_scalar_field_is_malformed() {
        let doc = parse_document("---\nid:\n  nested: true\n---\n");
        assert!(doc.metadata.is_none());
    }

    #[test]
    fn crlf_is_normalized() {
        let doc = parse_document("---\r\nid: a-x\r\n---\r\nbody\r\n");
        assert_eq!(doc.metadata.unwrap().id.as_deref(), Some("a-x"));
        assert_eq!(doc.body, "body\n");
    }

    #[test]
    fn closing_fence_at_end_of_file() {
        let (yaml, body) = split_frontmatter("---\nid: a-x\n---").unwrap();
        assert_eq!(yaml, "id: a-x");
        assert_eq!(body, "");
    }

    #[test]
    fn invalid_id_is_not_a_skill_id() {
        let meta = SkillMetadata {
            id: Some(String::new()),
            ..Default::default()
        };
        assert!(meta.skill_id().is_none());
    }
}
