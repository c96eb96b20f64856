//! ui::report
//!
//! Text rendering for command results.
//!
//! Every function returns the full text block; callers decide whether to
//! print it. Document paths are shown relative to the references
//! directory.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::analytics::{OrphanEntry, RankedSkill, StatsReport, NO_LAYER};
use crate::core::graph::CompositionGraph;
use crate::core::paths::display_relative;
use crate::core::registry::{GraphEntry, RegistrySnapshot};
use crate::core::types::SkillId;
use crate::core::verify::{BrokenReference, FormulaFinding, FormulaReport, VerifyReport};

use super::output::{format_capped, format_list};

fn join_ids(ids: &[SkillId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(SkillId::as_str).collect::<Vec<_>>().join(", ")
}

fn format_cycle(cycle: &[SkillId]) -> String {
    cycle.iter().map(SkillId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// Validation findings, cycles first, then per-file findings and a summary.
pub fn render_validation(report: &VerifyReport, base: &Path) -> String {
    if report.is_clean() {
        return format!(
            "All {} skill file(s) passed validation.",
            report.files_scanned
        );
    }

    let mut blocks = Vec::new();

    if !report.cycles.is_empty() {
        let cycles: Vec<_> = report.cycles.iter().map(|c| format_cycle(c)).collect();
        blocks.push(format!(
            "Composition cycles ({}):\n{}",
            report.cycles.len(),
            format_list(&cycles, "  ")
        ));
    }

    for result in &report.results {
        let mut lines = vec![display_relative(base, &result.file)];
        lines.extend(result.errors.iter().map(|e| format!("  error: {e}")));
        lines.extend(result.warnings.iter().map(|w| format!("  warning: {w}")));
        blocks.push(lines.join("\n"));
    }

    blocks.push(format!(
        "{} error(s), {} warning(s) in {} file(s) ({} scanned)",
        report.error_count(),
        report.warning_count(),
        report.results.len(),
        report.files_scanned
    ));
    blocks.join("\n\n")
}

/// Per-node adjacency with layers and display names.
pub fn render_graph(adjacency: &BTreeMap<SkillId, GraphEntry>, graph: &CompositionGraph) -> String {
    if adjacency.is_empty() {
        return "No skills loaded.".to_string();
    }

    adjacency
        .iter()
        .map(|(id, entry)| {
            let node = graph.node(id);
            let layer = node.and_then(|n| n.layer.as_deref()).unwrap_or(NO_LAYER);
            let title = match node.and_then(|n| n.name.as_deref()) {
                Some(name) => format!("{id} ({layer}): {name}"),
                None => format!("{id} ({layer})"),
            };
            format!(
                "{title}\n  composes: {}\n  composed by: {}",
                join_ids(&entry.composes),
                join_ids(&entry.composed_by)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Totals, per-layer table and rankings.
pub fn render_stats(stats: &StatsReport) -> String {
    let layers: Vec<_> = stats
        .by_layer
        .iter()
        .map(|(layer, s)| {
            format!(
                "{layer:<8} {:>4} skill(s)  avg {:.1} composition(s)",
                s.count, s.avg_compositions
            )
        })
        .collect();

    [
        format!(
            "Skills: {}\nComposition edges: {}",
            stats.total_skills, stats.composition_edges
        ),
        format!("By layer:\n{}", format_list(&layers, "  ")),
        format!("Most reused:\n{}", ranking_block(&stats.most_composed)),
        format!("Most dependencies:\n{}", ranking_block(&stats.most_composing)),
    ]
    .join("\n\n")
}

fn ranking_block(ranking: &[RankedSkill]) -> String {
    let lines: Vec<_> = ranking
        .iter()
        .filter(|r| r.count > 0)
        .map(|r| format!("{} ({})", r.id, r.count))
        .collect();
    if lines.is_empty() {
        "  (none)".to_string()
    } else {
        format_list(&lines, "  ")
    }
}

/// Orphan list with declared layers.
pub fn render_orphans(orphans: &[OrphanEntry]) -> String {
    if orphans.is_empty() {
        return "No orphaned skills.".to_string();
    }
    let lines: Vec<_> = orphans
        .iter()
        .map(|o| format!("{} ({})", o.id, o.layer.as_deref().unwrap_or(NO_LAYER)))
        .collect();
    format!(
        "Orphaned skills ({}):\n{}",
        orphans.len(),
        format_list(&lines, "  ")
    )
}

/// Formula findings and the valid count.
pub fn render_formulas(report: &FormulaReport, base: &Path) -> String {
    let label = |f: &FormulaFinding| match &f.id {
        Some(id) => id.to_string(),
        None => display_relative(base, &f.file),
    };

    let mut blocks = Vec::new();

    if !report.missing.is_empty() {
        let lines: Vec<_> = report.missing.iter().map(label).collect();
        blocks.push(format!(
            "Missing formula ({}):\n{}",
            report.missing.len(),
            format_list(&lines, "  ")
        ));
    }

    if !report.invalid.is_empty() {
        let lines: Vec<_> = report
            .invalid
            .iter()
            .map(|f| format!("{}: \"{}\"", label(f), f.formula.as_deref().unwrap_or_default()))
            .collect();
        blocks.push(format!(
            "Invalid formula ({}):\n{}",
            report.invalid.len(),
            format_list(&lines, "  ")
        ));
    }

    blocks.push(format!(
        "{} of {} skill(s) have a valid formula",
        report.valid, report.checked
    ));
    blocks.join("\n\n")
}

/// Broken references, capped at `max_listed`.
pub fn render_broken_refs(broken: &[BrokenReference], base: &Path, max_listed: usize) -> String {
    if broken.is_empty() {
        return "All composition references resolve.".to_string();
    }
    let lines: Vec<_> = broken
        .iter()
        .map(|b| format!("{} -> {}", display_relative(base, &b.file), b.reference))
        .collect();
    format!(
        "Broken composition references ({}):\n{}",
        broken.len(),
        format_capped(&lines, "  ", max_listed)
    )
}

/// Summary printed after writing a registry snapshot.
pub fn render_registry_written(snapshot: &RegistrySnapshot, path: &Path) -> String {
    format!(
        "Wrote {}\n  {} skill(s), {} composition edge(s), {} orphan(s), {} formula(s)\n  fingerprint {}",
        path.display(),
        snapshot.total_skills,
        snapshot.composition_edges,
        snapshot.orphans.len(),
        snapshot.formulas.len(),
        snapshot.fingerprint
    )
}
