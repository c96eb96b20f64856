//! core::verify::compose
//!
//! Checks on a document's `composes` list and its formula.

use std::collections::BTreeSet;

use crate::core::metadata::SkillMetadata;
use crate::core::rules::LayerRule;

use super::{ValidationResult, Validator};

/// How many missing ids a formula warning names before truncating.
const MAX_LISTED_MISSING: usize = 3;

/// Format, existence and direction of every composition reference.
///
/// A malformed reference is reported once and not checked further. The
/// direction check needs a recognized declared layer.
pub(super) fn check_references(
    validator: &Validator<'_>,
    meta: &SkillMetadata,
    rule: Option<&LayerRule>,
    result: &mut ValidationResult,
) {
    for reference in meta.composes() {
        if !validator.patterns.compose_path.is_match(reference) {
            result.error(format!(
                "Invalid composes format: \"{reference}\" (expected \"../directory/filename.md\")"
            ));
            continue;
        }

        if !validator.reference_exists(reference) {
            result.error(format!("Broken composition reference: {reference}"));
        }

        let (Some(rule), Some(resolved)) = (rule, validator.rules.resolve(reference)) else {
            continue;
        };
        if resolved.layer >= rule.layer {
            result.error(format!(
                "Upward composition violation: {} cannot compose from {} ({reference})",
                rule.layer, resolved.layer
            ));
        }
    }
}

/// Presence, shape and consistency of the formula on layers that need one.
pub(super) fn check_formula(
    validator: &Validator<'_>,
    meta: &SkillMetadata,
    rule: Option<&LayerRule>,
    result: &mut ValidationResult,
) {
    let Some(rule) = rule.filter(|r| r.formula_required) else {
        return;
    };
    let Some(formula) = meta.formula() else {
        result.warn(format!("Missing formula field (required for {})", rule.layer));
        return;
    };

    if let Some(pattern) = validator.rules.formula_pattern() {
        if !pattern.is_match(formula) {
            result.warn(format!("Invalid formula format: \"{formula}\""));
        }
    }

    let mentioned: BTreeSet<&str> = validator
        .patterns
        .formula_id
        .captures_iter(formula)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect();

    let mut seen = BTreeSet::new();
    let missing: Vec<String> = meta
        .composes()
        .iter()
        .filter(|reference| validator.patterns.compose_path.is_match(reference))
        .filter_map(|reference| validator.rules.resolve(reference))
        .map(|resolved| resolved.id.to_string())
        .filter(|id| !mentioned.contains(id.as_str()))
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if missing.is_empty() {
        return;
    }
    let listed = missing
        .iter()
        .take(MAX_LISTED_MISSING)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let more = if missing.len() > MAX_LISTED_MISSING {
        "..."
    } else {
        ""
    };
    result.warn(format!(
        "Formula missing {} composed skill(s): {listed}{more}",
        missing.len()
    ));
}

/// Minimum number of declared compositions for layers that must compose.
pub(super) fn check_min_compositions(
    meta: &SkillMetadata,
    rule: Option<&LayerRule>,
    result: &mut ValidationResult,
) {
    let Some((rule, min)) = rule.and_then(|r| r.min_compositions.map(|m| (r, m))) else {
        return;
    };
    let count = meta.composes().len();
    if count < min {
        result.warn(format!(
            "Insufficient compositions: {count} < {min} required for {}",
            rule.layer
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::SkillDocument;
    use crate::core::rules::LayerRuleset;
    use crate::core::types::Layer;

    fn meta(composes: &[&str], formula: Option<&str>) -> SkillMetadata {
        SkillMetadata {
            id: Some("m-card".into()),
            layer: Some("L2".into()),
            composes: Some(composes.iter().map(|s| s.to_string()).collect()),
            formula: formula.map(String::from),
            ..Default::default()
        }
    }

    fn with_validator(docs: &[SkillDocument], f: impl FnOnce(&Validator<'_>, &LayerRuleset)) {
        let rules = LayerRuleset::builtin();
        let validator = Validator::new(&rules, docs).unwrap();
        f(&validator, &rules);
    }

    #[test]
    fn duplicate_references_are_named_once() {
        let m = meta(&["../atoms/icon.md", "../atoms/icon.md"], Some("Card = Box"));
        with_validator(&[], |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_formula(v, &m, rules.get(Layer::new(2)), &mut result);
            assert_eq!(
                result.warnings,
                vec!["Formula missing 1 composed skill(s): a-icon"]
            );
        });
    }

    #[test]
    fn unresolvable_references_do_not_count_against_formula() {
        let m = meta(&["../widgets/x.md"], Some("Card = Box"));
        with_validator(&[], |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_formula(v, &m, rules.get(Layer::new(2)), &mut result);
            assert!(result.warnings.is_empty());
        });
    }

    #[test]
    fn malformed_references_do_not_count_against_formula() {
        let m = meta(&["../atoms/Button.md"], Some("M = X"));
        with_validator(&[], |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_formula(v, &m, rules.get(Layer::new(2)), &mut result);
            assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        });
    }

    #[test]
    fn formula_not_required_below_l2() {
        let m = meta(&[], None);
        with_validator(&[], |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_formula(v, &m, rules.get(Layer::new(1)), &mut result);
            assert!(result.warnings.is_empty());
        });
    }

    #[test]
    fn unknown_directory_is_broken_but_not_upward() {
        let m = meta(&["../widgets/x.md"], None);
        with_validator(&[], |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_references(v, &m, rules.get(Layer::new(2)), &mut result);
            assert_eq!(result.errors, vec!["Broken composition reference: ../widgets/x.md"]);
        });
    }

    #[test]
    fn downward_reference_to_loaded_document_passes() {
        let docs = vec![SkillDocument::from_content(
            "r/atoms/icon.md",
            "---\nid: a-icon\nlayer: L1\n---\n",
        )];
        let m = meta(&["../atoms/icon.md"], None);
        with_validator(&docs, |v, rules| {
            let mut result = ValidationResult::new("x.md");
            check_references(v, &m, rules.get(Layer::new(2)), &mut result);
            assert!(result.errors.is_empty(), "{:?}", result.errors);
        });
    }

    #[test]
    fn minimum_only_without_rule_is_skipped() {
        let mut result = ValidationResult::new("x.md");
        check_min_compositions(&meta(&[], None), None, &mut result);
        assert!(result.warnings.is_empty());
    }
}
