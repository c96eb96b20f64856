//! core::verify::fields
//!
//! Single-document field and content checks.

use crate::core::document::SkillDocument;
use crate::core::metadata::SkillMetadata;
use crate::core::paths::normalize;
use crate::core::rules::{LayerRule, LayerRuleset};

use super::{ValidationResult, Validator};

const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "name",
    "version",
    "layer",
    "category",
    "description",
    "tags",
];

const RECOMMENDED_SECTIONS: [&str; 4] = ["Overview", "When to Use", "Implementation", "Examples"];

const COMPOSITION_DIAGRAM: &str = "Composition Diagram";

/// First rank that must carry a composition diagram.
const DIAGRAM_MIN_RANK: u8 = 2;

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

pub(super) fn check_required(meta: &SkillMetadata, result: &mut ValidationResult) {
    for field in REQUIRED_FIELDS {
        let present = match field {
            "id" => is_present(&meta.id),
            "name" => is_present(&meta.name),
            "version" => is_present(&meta.version),
            "layer" => is_present(&meta.layer),
            "category" => is_present(&meta.category),
            "description" => is_present(&meta.description),
            "tags" => meta.tags.is_some(),
            _ => true,
        };
        if !present {
            result.error(format!("Missing required field: {field}"));
        }
    }
}

/// Check the declared layer and the id prefix it implies.
///
/// Returns the rule of the declared layer when it is recognized; rank
/// dependent checks are skipped otherwise.
pub(super) fn check_layer<'r>(
    rules: &'r LayerRuleset,
    doc: &SkillDocument,
    meta: &SkillMetadata,
    result: &mut ValidationResult,
) -> Option<&'r LayerRule> {
    let declared = meta.layer.as_deref().filter(|l| !l.is_empty())?;

    let Some(rule) = rules.get_declared(declared) else {
        result.error(format!(
            "Invalid layer format: \"{declared}\" (expected {})",
            rules.range_label()
        ));
        return None;
    };

    if let Some(dir) = doc.directory() {
        if let Some(dir_rule) = rules.layer_for_directory(dir) {
            if dir_rule.layer != rule.layer {
                result.error(format!(
                    "Layer \"{declared}\" does not match directory \"{dir}\" (expected {})",
                    dir_rule.layer
                ));
            }
        }
    }

    if let Some(id) = meta.id.as_deref().filter(|id| !id.is_empty()) {
        if !id.starts_with(&rule.id_prefix) {
            result.error(format!(
                "ID \"{id}\" should start with \"{}\" for {}",
                rule.id_prefix, rule.layer
            ));
        }
    }

    Some(rule)
}

pub(super) fn check_category(
    meta: &SkillMetadata,
    rule: Option<&LayerRule>,
    result: &mut ValidationResult,
) {
    let (Some(category), Some(rule)) = (meta.category.as_deref(), rule) else {
        return;
    };
    if rule.categories.is_empty() || rule.categories.iter().any(|c| c == category) {
        return;
    }
    result.warn(format!(
        "Category \"{category}\" not in allowed list for {}: [{}]",
        rule.layer,
        rule.categories.join(", ")
    ));
}

/// Markdown links to sibling documents must point at loaded files.
pub(super) fn check_cross_refs(
    validator: &Validator<'_>,
    doc: &SkillDocument,
    result: &mut ValidationResult,
) {
    let base = doc.path.parent().unwrap_or(doc.path.as_path());
    for cap in validator.patterns.cross_ref.captures_iter(&doc.body) {
        let Some(m) = cap.get(1) else {
            continue;
        };
        let target = normalize(&base.join(m.as_str()));
        if !validator.known_files.contains(&target) {
            result.warn(format!("Broken cross-reference in content: {}", m.as_str()));
        }
    }
}

pub(super) fn check_sections(
    doc: &SkillDocument,
    rule: Option<&LayerRule>,
    result: &mut ValidationResult,
) {
    let exempt = |section: &str| rule.is_some_and(|r| r.is_exempt(section));

    for section in RECOMMENDED_SECTIONS {
        if exempt(section) {
            continue;
        }
        if !doc.body.contains(&format!("## {section}")) {
            result.warn(format!("Missing recommended section: ## {section}"));
        }
    }

    let Some(rule) = rule else {
        return;
    };
    if rule.layer.rank() >= DIAGRAM_MIN_RANK
        && !exempt(COMPOSITION_DIAGRAM)
        && !doc.body.contains(&format!("## {COMPOSITION_DIAGRAM}"))
    {
        result.warn(format!(
            "Missing {COMPOSITION_DIAGRAM} section (required for L{DIAGRAM_MIN_RANK}+)"
        ));
    }
}

pub(super) fn check_version(
    validator: &Validator<'_>,
    meta: &SkillMetadata,
    result: &mut ValidationResult,
) {
    let Some(version) = meta.version.as_deref().filter(|v| !v.is_empty()) else {
        return;
    };
    if !validator.patterns.version.is_match(version) {
        result.error(format!(
            "Invalid version format: \"{version}\" (expected semver)"
        ));
    }
}

pub(super) fn check_tags(
    validator: &Validator<'_>,
    meta: &SkillMetadata,
    result: &mut ValidationResult,
) {
    for tag in meta.tags() {
        if !validator.patterns.tag.is_match(tag) {
            result.warn(format!(
                "Invalid tag format: \"{tag}\" (should be lowercase with hyphens)"
            ));
        }
    }
}
