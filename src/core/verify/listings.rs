//! core::verify::listings
//!
//! Corpus-wide listings behind the `refs` and `formulas` commands.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::document::SkillDocument;
use crate::core::rules::LayerRuleset;
use crate::core::types::SkillId;

use super::{Validator, VerifyError};

/// A well-formed composition reference that resolves to no loaded skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenReference {
    /// Document declaring the reference
    pub file: PathBuf,
    /// Declaring skill, when it has a valid id
    pub id: Option<SkillId>,
    /// The reference as written
    pub reference: String,
}

/// Every broken composition reference, in document order.
pub fn find_broken_references(
    documents: &[SkillDocument],
    rules: &LayerRuleset,
) -> Result<Vec<BrokenReference>, VerifyError> {
    let validator = Validator::new(rules, documents)?;
    let mut broken = Vec::new();
    for doc in documents {
        for reference in validator.broken_references(doc) {
            broken.push(BrokenReference {
                file: doc.path.clone(),
                id: doc.skill_id(),
                reference,
            });
        }
    }
    Ok(broken)
}

/// A document whose formula is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaFinding {
    pub file: PathBuf,
    pub id: Option<SkillId>,
    /// The formula as written; `None` when missing
    pub formula: Option<String>,
}

/// Formula status of every document on a layer that requires one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaReport {
    /// Documents on formula-bearing layers
    pub checked: usize,
    /// Documents with a formula matching the configured pattern
    pub valid: usize,
    pub missing: Vec<FormulaFinding>,
    pub invalid: Vec<FormulaFinding>,
}

impl FormulaReport {
    /// Whether every checked document has a valid formula.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Check formulas on every layer that requires them.
///
/// The layer is the declared one; documents with an unrecognized layer
/// are not checked.
pub fn formula_report(documents: &[SkillDocument], rules: &LayerRuleset) -> FormulaReport {
    let mut report = FormulaReport::default();

    for doc in documents {
        let Some(meta) = doc.metadata.as_ref() else {
            continue;
        };
        let required = meta
            .layer
            .as_deref()
            .and_then(|l| rules.get_declared(l))
            .is_some_and(|rule| rule.formula_required);
        if !required {
            continue;
        }
        report.checked += 1;

        let finding = |formula: Option<&str>| FormulaFinding {
            file: doc.path.clone(),
            id: doc.skill_id(),
            formula: formula.map(String::from),
        };

        match meta.formula() {
            None => report.missing.push(finding(None)),
            Some(formula) => match rules.formula_pattern() {
                Some(pattern) if !pattern.is_match(formula) => {
                    report.invalid.push(finding(Some(formula)))
                }
                _ => report.valid += 1,
            },
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{FormulaRules, LayerEntry, LayerRulesFile};

    fn doc(path: &str, frontmatter: &str) -> SkillDocument {
        SkillDocument::from_content(path, &format!("---\n{frontmatter}\n---\n"))
    }

    #[test]
    fn broken_references_carry_owner() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            doc("r/atoms/icon.md", "id: a-icon\nlayer: L1"),
            doc(
                "r/molecules/card.md",
                "id: m-card\nlayer: L2\ncomposes: [../atoms/icon.md, ../atoms/ghost.md]",
            ),
        ];
        let broken = find_broken_references(&docs, &rules).unwrap();
        assert_eq!(
            broken,
            vec![BrokenReference {
                file: PathBuf::from("r/molecules/card.md"),
                id: Some(SkillId::new("m-card").unwrap()),
                reference: "../atoms/ghost.md".into(),
            }]
        );
    }

    #[test]
    fn formula_report_with_builtin_rules() {
        let rules = LayerRuleset::builtin();
        let docs = vec![
            doc("r/atoms/icon.md", "id: a-icon\nlayer: L1"),
            doc("r/molecules/a.md", "id: m-a\nlayer: L2\nformula: \"A = B\""),
            doc("r/molecules/b.md", "id: m-b\nlayer: L2"),
            doc("r/molecules/c.md", "id: m-c\nlayer: L9"),
        ];
        let report = formula_report(&docs, &rules);
        assert_eq!(report.checked, 2);
        assert_eq!(report.valid, 1);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].id, Some(SkillId::new("m-b").unwrap()));
        assert!(report.invalid.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn formula_report_applies_pattern() {
        let mut file = LayerRulesFile::default();
        file.layers.insert(
            "L0".into(),
            LayerEntry {
                name: "Base".into(),
                directory: "base".into(),
                id_prefix: "b-".into(),
                ..Default::default()
            },
        );
        file.validation.formula_rules = Some(FormulaRules {
            pattern: Some("^[A-Z]".into()),
            required: vec!["L0".into()],
        });
        let rules = LayerRuleset::from_schema(file).unwrap();
        let docs = vec![
            doc("r/base/x.md", "id: b-x\nlayer: L0\nformula: \"X = y\""),
            doc("r/base/y.md", "id: b-y\nlayer: L0\nformula: \"lower\""),
        ];
        let report = formula_report(&docs, &rules);
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid[0].formula.as_deref(), Some("lower"));
    }
}
