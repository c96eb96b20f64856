//! core::verify
//!
//! Structural validation of skill documents and the composition graph.
//!
//! # Findings
//!
//! - **Errors** break corpus integrity: missing identity or required
//!   fields, malformed layer or version, broken or upward composition
//!   references, duplicate ids, cycles.
//! - **Warnings** are convention drift: category and tag style, missing
//!   recommended sections, formula problems, under-composition, broken
//!   content links.
//!
//! Findings accumulate per document; one document never stops another
//! from being checked. The only corpus-wide check is the cycle pass over
//! the graph, computed once.
//!
//! # Invariants
//!
//! - Never mutates documents or the graph
//! - Deterministic: same corpus, same findings in the same order

mod compose;
mod fields;
mod listings;

pub use listings::{
    find_broken_references, formula_report, BrokenReference, FormulaFinding, FormulaReport,
};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::document::SkillDocument;
use super::graph::CompositionGraph;
use super::paths::normalize;
use super::rules::LayerRuleset;
use super::types::{Layer, SkillId};

/// Errors that prevent validation from running at all.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to compile validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Findings for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// The validated file
    pub file: PathBuf,
    /// Integrity violations, in detection order
    pub errors: Vec<String>,
    /// Convention deviations, in detection order
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// An empty result for `file`.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Whether there are no findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Result of validating a whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// Number of documents considered
    pub files_scanned: usize,
    /// Results with at least one finding, in document order
    pub results: Vec<ValidationResult>,
    /// Cycles in the composition graph
    pub cycles: Vec<Vec<SkillId>>,
}

impl VerifyReport {
    /// Document errors plus one per cycle.
    pub fn error_count(&self) -> usize {
        self.cycles.len() + self.results.iter().map(|r| r.errors.len()).sum::<usize>()
    }

    /// Total warnings.
    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warnings.len()).sum()
    }

    /// Whether the corpus has no errors. Warnings never fail a run.
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Whether there is nothing at all to report.
    pub fn is_clean(&self) -> bool {
        self.results.is_empty() && self.cycles.is_empty()
    }
}

/// Compiled fixed-syntax patterns.
#[derive(Debug, Clone)]
struct Patterns {
    compose_path: Regex,
    cross_ref: Regex,
    formula_id: Regex,
    version: Regex,
    tag: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            compose_path: Regex::new(r"^\.\./[a-z]+/[a-z0-9-]+\.md$")?,
            cross_ref: Regex::new(r"\[.*?\]\((\.\./[^)]+\.md)\)")?,
            formula_id: Regex::new(r"\(([a-z]+-[a-z0-9-]+)\)")?,
            version: Regex::new(r"^\d+\.\d+\.\d+$")?,
            tag: Regex::new(r"^[a-z][a-z0-9-]*$")?,
        })
    }
}

/// Per-document validator with corpus-wide lookup tables.
///
/// # Example
///
/// ```
/// use skillgraph::core::document::SkillDocument;
/// use skillgraph::core::rules::LayerRuleset;
/// use skillgraph::core::verify::Validator;
///
/// let docs = vec![SkillDocument::from_content(
///     "references/atoms/button.md",
///     "---\nid: a-button\nlayer: L1\ncomposes: [../primitives/ghost.md]\n---\n",
/// )];
/// let rules = LayerRuleset::builtin();
/// let validator = Validator::new(&rules, &docs).unwrap();
///
/// let result = validator.validate(&docs[0]);
/// assert!(result
///     .errors
///     .contains(&"Broken composition reference: ../primitives/ghost.md".to_string()));
/// ```
#[derive(Debug)]
pub struct Validator<'a> {
    rules: &'a LayerRuleset,
    known_ids: HashSet<SkillId>,
    known_files: HashSet<PathBuf>,
    first_owner: HashMap<SkillId, &'a Path>,
    patterns: Patterns,
}

impl<'a> Validator<'a> {
    /// Index the corpus for validation.
    pub fn new(rules: &'a LayerRuleset, documents: &'a [SkillDocument]) -> Result<Self, VerifyError> {
        let mut known_ids = HashSet::new();
        let mut first_owner = HashMap::new();
        let mut known_files = HashSet::new();

        for doc in documents {
            known_files.insert(normalize(&doc.path));
            if let Some(id) = doc.skill_id() {
                first_owner.entry(id.clone()).or_insert(doc.path.as_path());
                known_ids.insert(id);
            }
        }

        Ok(Self {
            rules,
            known_ids,
            known_files,
            first_owner,
            patterns: Patterns::compile()?,
        })
    }

    /// Validate one document.
    pub fn validate(&self, doc: &SkillDocument) -> ValidationResult {
        let mut result = ValidationResult::new(&doc.path);

        let Some(meta) = doc.metadata.as_ref() else {
            result.error("Missing or invalid YAML frontmatter");
            return result;
        };

        fields::check_required(meta, &mut result);
        self.check_duplicate(doc, &mut result);
        let rule = fields::check_layer(self.rules, doc, meta, &mut result);
        fields::check_category(meta, rule, &mut result);
        compose::check_references(self, meta, rule, &mut result);
        fields::check_cross_refs(self, doc, &mut result);
        fields::check_sections(doc, rule, &mut result);
        compose::check_formula(self, meta, rule, &mut result);
        compose::check_min_compositions(meta, rule, &mut result);
        fields::check_version(self, meta, &mut result);
        fields::check_tags(self, meta, &mut result);

        result
    }

    /// Broken composition references of one document, unformatted.
    ///
    /// Only well-formed `../dir/file.md` references are considered.
    pub fn broken_references(&self, doc: &SkillDocument) -> Vec<String> {
        let Some(meta) = doc.metadata.as_ref() else {
            return Vec::new();
        };
        meta.composes()
            .iter()
            .filter(|r| self.patterns.compose_path.is_match(r))
            .filter(|r| !self.reference_exists(r))
            .cloned()
            .collect()
    }

    /// Whether a reference resolves to a loaded document id.
    fn reference_exists(&self, reference: &str) -> bool {
        self.rules
            .resolve(reference)
            .is_some_and(|resolved| self.known_ids.contains(&resolved.id))
    }

    fn check_duplicate(&self, doc: &SkillDocument, result: &mut ValidationResult) {
        let Some(id) = doc.skill_id() else {
            return;
        };
        if let Some(owner) = self.first_owner.get(&id) {
            if *owner != doc.path.as_path() {
                result.error(format!(
                    "Duplicate id \"{}\" (already declared by {})",
                    id,
                    owner.display()
                ));
            }
        }
    }
}

/// Validate every document (optionally only those of one layer's
/// directory) and run the cycle pass over the graph.
pub fn verify_corpus(
    documents: &[SkillDocument],
    graph: &CompositionGraph,
    rules: &LayerRuleset,
    layer_filter: Option<Layer>,
) -> Result<VerifyReport, VerifyError> {
    let validator = Validator::new(rules, documents)?;
    let filter_dir = layer_filter
        .and_then(|layer| rules.get(layer))
        .map(|rule| rule.directory.as_str());

    let mut report = VerifyReport {
        cycles: graph.find_cycles(),
        ..Default::default()
    };

    for doc in documents {
        if let Some(dir) = filter_dir {
            if doc.directory() != Some(dir) {
                continue;
            }
        }
        report.files_scanned += 1;

        let result = validator.validate(doc);
        if !result.is_clean() {
            report.results.push(result);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{FormulaRules, LayerEntry, LayerRulesFile};

    const SECTIONS: &str =
        "## Overview\n## When to Use\n## Implementation\n## Examples\n## Composition Diagram\n";

    /// Build a document with a well-formed frontmatter block.
    fn skill(path: &str, frontmatter: &str, body: &str) -> SkillDocument {
        SkillDocument::from_content(path, &format!("---\n{frontmatter}\n---\n{body}"))
    }

    fn fm(id: &str, layer: &str, extra: &str) -> String {
        format!(
            "id: {id}\nname: Test\nversion: 1.0.0\nlayer: {layer}\ncategory: general\n\
             description: A test skill\ntags: [test]\n{extra}"
        )
    }

    fn validate_one(docs: &[SkillDocument], rules: &LayerRuleset, index: usize) -> ValidationResult {
        Validator::new(rules, docs).unwrap().validate(&docs[index])
    }

    /// Three-layer ruleset with formula checks on L2 and a minimum on L2.
    fn strict_rules() -> LayerRuleset {
        let mut file = LayerRulesFile::default();
        for (key, name, dir, prefix, composes) in [
            ("L0", "Primitives", "primitives", "p-", vec![]),
            ("L1", "Atoms", "atoms", "a-", vec!["L0"]),
            ("L2", "Molecules", "molecules", "m-", vec!["L0", "L1"]),
        ] {
            file.layers.insert(
                key.into(),
                LayerEntry {
                    name: name.into(),
                    directory: dir.into(),
                    id_prefix: prefix.into(),
                    can_compose: composes.into_iter().map(String::from).collect(),
                    ..Default::default()
                },
            );
        }
        let l2 = file.layers.get_mut("L2").unwrap();
        l2.must_compose = true;
        l2.min_compositions = Some(2);
        l2.categories = vec!["forms".into()];
        file.validation.formula_rules = Some(FormulaRules {
            pattern: Some(r"^[A-Z][A-Za-z]* = ".into()),
            required: vec!["L2".into()],
        });
        LayerRuleset::from_schema(file).unwrap()
    }

    #[test]
    fn clean_document_has_no_findings() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/b.md", &fm("a-b", "L1", ""), SECTIONS),
            skill(
                "r/molecules/a.md",
                &fm(
                    "m-a",
                    "L2",
                    "composes: [../atoms/b.md]\nformula: \"A = B(a-b)\"",
                ),
                SECTIONS,
            ),
        ];
        let result = validate_one(&docs, &rules, 1);
        assert!(result.is_clean(), "{result:?}");
    }

    #[test]
    fn missing_frontmatter_is_single_error() {
        let rules = LayerRuleset::builtin();
        let docs = vec![SkillDocument::from_content("r/atoms/x.md", "# no metadata")];
        let result = validate_one(&docs, &rules, 0);
        assert_eq!(result.errors, vec!["Missing or invalid YAML frontmatter"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn upward_composition_is_one_error_per_reference() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/molecules/m.md", &fm("m-m", "L2", ""), SECTIONS),
            skill("r/organisms/o.md", &fm("o-o", "L3", ""), SECTIONS),
            skill(
                "r/atoms/a.md",
                &fm("a-a", "L1", "composes: [../molecules/m.md, ../organisms/o.md]"),
                SECTIONS,
            ),
        ];
        let result = validate_one(&docs, &rules, 2);
        let upward: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.starts_with("Upward composition violation"))
            .collect();
        assert_eq!(upward.len(), 2);
        assert_eq!(
            upward[0],
            "Upward composition violation: L1 cannot compose from L2 (../molecules/m.md)"
        );
    }

    #[test]
    fn same_layer_composition_is_upward() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/x.md", &fm("a-x", "L1", ""), SECTIONS),
            skill("r/atoms/y.md", &fm("a-y", "L1", "composes: [../atoms/x.md]"), SECTIONS),
        ];
        let result = validate_one(&docs, &rules, 1);
        assert_eq!(
            result.errors,
            vec!["Upward composition violation: L1 cannot compose from L1 (../atoms/x.md)"]
        );
    }

    #[test]
    fn broken_reference_is_one_error() {
        let rules = LayerRuleset::builtin();
        let docs = vec![skill(
            "r/molecules/a.md",
            &fm("m-a", "L2", "composes: [../atoms/ghost.md]\nformula: \"A = G(a-ghost)\""),
            SECTIONS,
        )];
        let result = validate_one(&docs, &rules, 0);
        assert_eq!(result.errors, vec!["Broken composition reference: ../atoms/ghost.md"]);
    }

    #[test]
    fn malformed_reference_is_reported_and_skipped() {
        let rules = LayerRuleset::builtin();
        let docs = vec![skill(
            "r/molecules/a.md",
            &fm("m-a", "L2", "composes: [atoms/Button.md]"),
            SECTIONS,
        )];
        let result = validate_one(&docs, &rules, 0);
        assert_eq!(
            result.errors,
            vec![
                "Invalid composes format: \"atoms/Button.md\" (expected \"../directory/filename.md\")"
            ]
        );
    }

    #[test]
    fn duplicate_id_reported_on_later_document() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/one.md", &fm("a-x", "L1", ""), SECTIONS),
            skill("r/atoms/two.md", &fm("a-x", "L1", ""), SECTIONS),
        ];
        assert!(validate_one(&docs, &rules, 0).errors.is_empty());
        assert_eq!(
            validate_one(&docs, &rules, 1).errors,
            vec!["Duplicate id \"a-x\" (already declared by r/atoms/one.md)"]
        );
    }

    #[test]
    fn ids_with_spaces_stay_in_graph_and_duplicate_check() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/one.md", &fm("a-x y", "L1", ""), SECTIONS),
            skill("r/atoms/two.md", &fm("a-x y", "L1", ""), SECTIONS),
        ];
        let graph = CompositionGraph::build(&docs, &rules);
        assert_eq!(graph.node_count(), 1);

        let report = verify_corpus(&docs, &graph, &rules, None).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(
            report.results[0].errors,
            vec!["Duplicate id \"a-x y\" (already declared by r/atoms/one.md)"]
        );
    }

    #[test]
    fn formula_missing_one_composed_id() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/x.md", &fm("a-x", "L1", ""), SECTIONS),
            skill(
                "r/molecules/m.md",
                &fm("m-m", "L2", "composes: [../atoms/x.md]\nformula: \"M = Other(a-other)\""),
                SECTIONS,
            ),
        ];
        let result = validate_one(&docs, &rules, 1);
        assert_eq!(result.warnings, vec!["Formula missing 1 composed skill(s): a-x"]);
    }

    #[test]
    fn formula_missing_list_is_capped() {
        let rules = LayerRuleset::builtin();
        let mut docs: Vec<_> = ["b", "c", "d", "e"]
            .iter()
            .map(|n| skill(&format!("r/atoms/{n}.md"), &fm(&format!("a-{n}"), "L1", ""), SECTIONS))
            .collect();
        docs.push(skill(
            "r/molecules/m.md",
            &fm(
                "m-m",
                "L2",
                "composes: [../atoms/b.md, ../atoms/c.md, ../atoms/d.md, ../atoms/e.md]\nformula: \"M = nothing\"",
            ),
            SECTIONS,
        ));
        let result = validate_one(&docs, &rules, 4);
        assert_eq!(
            result.warnings,
            vec!["Formula missing 4 composed skill(s): a-b, a-c, a-d..."]
        );
    }

    #[test]
    fn missing_formula_is_warning() {
        let rules = LayerRuleset::builtin();
        let docs = vec![skill("r/molecules/m.md", &fm("m-m", "L2", ""), SECTIONS)];
        let result = validate_one(&docs, &rules, 0);
        assert_eq!(result.warnings, vec!["Missing formula field (required for L2)"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn strict_rules_apply_pattern_minimum_and_categories() {
        let rules = strict_rules();
        let docs = vec![
            skill("r/atoms/x.md", &fm("a-x", "L1", ""), SECTIONS),
            skill(
                "r/molecules/m.md",
                &fm("m-m", "L2", "composes: [../atoms/x.md]\nformula: \"lowercase(a-x)\""),
                SECTIONS,
            ),
        ];
        let result = validate_one(&docs, &rules, 1);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            result.warnings,
            vec![
                "Category \"general\" not in allowed list for L2: [forms]",
                "Invalid formula format: \"lowercase(a-x)\"",
                "Insufficient compositions: 1 < 2 required for L2",
            ]
        );
    }

    #[test]
    fn invalid_layer_skips_rank_checks() {
        let rules = LayerRuleset::builtin();
        let docs = vec![skill(
            "r/atoms/x.md",
            &fm("a-x", "L9", "composes: [../atoms/y.md]"),
            SECTIONS,
        )];
        let result = validate_one(&docs, &rules, 0);
        assert_eq!(
            result.errors,
            vec![
                "Invalid layer format: \"L9\" (expected L0-L6)",
                "Broken composition reference: ../atoms/y.md",
            ]
        );
    }

    #[test]
    fn verify_corpus_counts_cycles_as_errors() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/x.md", &fm("a-x", "L1", "composes: [../atoms/y.md]"), SECTIONS),
            skill("r/atoms/y.md", &fm("a-y", "L1", "composes: [../atoms/x.md]"), SECTIONS),
        ];
        let graph = CompositionGraph::build(&docs, &rules);
        let report = verify_corpus(&docs, &graph, &rules, None).unwrap();

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.files_scanned, 2);
        // One upward error per document plus the cycle
        assert_eq!(report.error_count(), 3);
        assert!(!report.passed());
    }

    #[test]
    fn verify_corpus_warnings_do_not_fail() {
        let rules = LayerRuleset::builtin();
        let docs = vec![skill("r/atoms/x.md", &fm("a-x", "L1", ""), "no sections")];
        let graph = CompositionGraph::build(&docs, &rules);
        let report = verify_corpus(&docs, &graph, &rules, None).unwrap();

        assert!(report.warning_count() > 0);
        assert!(report.passed());
        assert!(!report.is_clean());
    }

    #[test]
    fn verify_corpus_layer_filter() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/atoms/x.md", &fm("a-x", "L1", ""), ""),
            skill("r/primitives/p.md", &fm("p-p", "L0", ""), ""),
        ];
        let graph = CompositionGraph::build(&docs, &rules);
        let report = verify_corpus(&docs, &graph, &rules, Some(Layer::new(0))).unwrap();

        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].file, PathBuf::from("r/primitives/p.md"));
    }

    #[test]
    fn broken_references_lists_only_dangling() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            skill("r/primitives/p.md", &fm("p-p", "L0", ""), ""),
            skill(
                "r/atoms/x.md",
                &fm("a-x", "L1", "composes: [../primitives/p.md, ../primitives/q.md, bad]"),
                "",
            ),
        ];
        let validator = Validator::new(&rules, &docs).unwrap();
        assert_eq!(validator.broken_references(&docs[1]), vec!["../primitives/q.md"]);
    }
}
