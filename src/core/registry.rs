//! core::registry
//!
//! The registry snapshot: a machine-readable summary of the composition
//! graph written next to the corpus.
//!
//! # Format
//!
//! Pretty-printed JSON with camelCase keys. Every collection is ordered,
//! so two snapshots of the same corpus differ only in `generated`. The
//! `fingerprint` field hashes the edge set and can be compared directly.
//!
//! # Writing
//!
//! The snapshot is written to a temp file in the target directory, synced
//! and renamed over the target. A failed write leaves any previous
//! snapshot untouched.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::analytics::{Analytics, LayerStats};
use super::document::SkillDocument;
use super::graph::CompositionGraph;
use super::rules::LayerRuleset;
use super::types::{Fingerprint, SkillId};

/// Errors from writing a registry snapshot.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write registry file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> RegistryError {
    let path = path.to_path_buf();
    move |source| RegistryError::WriteError { path, source }
}

/// Adjacency of one node as stored in the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEntry {
    pub composed_by: Vec<SkillId>,
    pub composes: Vec<SkillId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusedEntry {
    pub id: SkillId,
    pub used_by: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEntry {
    pub id: SkillId,
    pub depends_on: usize,
}

/// Full registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub generated: DateTime<Utc>,
    pub total_skills: usize,
    pub composition_edges: usize,
    pub by_layer: BTreeMap<String, LayerStats>,
    pub graph: BTreeMap<SkillId, GraphEntry>,
    pub orphans: Vec<SkillId>,
    pub most_reused: Vec<ReusedEntry>,
    pub most_dependencies: Vec<DependencyEntry>,
    pub formulas: BTreeMap<SkillId, String>,
    pub fingerprint: Fingerprint,
}

/// Per-node adjacency, both directions sorted. Dangling targets have no
/// entry of their own.
pub fn adjacency(graph: &CompositionGraph) -> BTreeMap<SkillId, GraphEntry> {
    graph
        .nodes()
        .map(|node| {
            let collect = |set: Option<&BTreeSet<SkillId>>| {
                set.map(|s| s.iter().cloned().collect()).unwrap_or_default()
            };
            (
                node.id.clone(),
                GraphEntry {
                    composed_by: collect(graph.composed_by(&node.id)),
                    composes: collect(graph.composes(&node.id)),
                },
            )
        })
        .collect()
}

/// Formula of each node, taken from the document that owns the id.
fn formulas(documents: &[SkillDocument]) -> BTreeMap<SkillId, String> {
    let mut seen = HashSet::new();
    let mut formulas = BTreeMap::new();
    for doc in documents {
        let Some(id) = doc.skill_id() else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(formula) = doc.metadata.as_ref().and_then(|m| m.formula()) {
            formulas.insert(id, formula.to_string());
        }
    }
    formulas
}

impl RegistrySnapshot {
    /// Build a snapshot stamped with the current time.
    pub fn build(
        graph: &CompositionGraph,
        documents: &[SkillDocument],
        rules: &LayerRuleset,
        top_n: usize,
    ) -> Self {
        Self::build_at(graph, documents, rules, top_n, Utc::now())
    }

    /// Build a snapshot with an explicit timestamp.
    pub fn build_at(
        graph: &CompositionGraph,
        documents: &[SkillDocument],
        rules: &LayerRuleset,
        top_n: usize,
        generated: DateTime<Utc>,
    ) -> Self {
        let analytics = Analytics::new(graph, rules);

        let most_reused = analytics
            .most_composed(top_n)
            .into_iter()
            .filter(|r| r.count > 0)
            .map(|r| ReusedEntry {
                id: r.id,
                used_by: r.count,
            })
            .collect();

        let most_dependencies = analytics
            .most_composing(top_n)
            .into_iter()
            .filter(|r| r.count > 0)
            .map(|r| DependencyEntry {
                id: r.id,
                depends_on: r.count,
            })
            .collect();

        Self {
            generated,
            total_skills: analytics.total_skills(),
            composition_edges: analytics.composition_edges(),
            by_layer: analytics.by_layer(),
            graph: adjacency(graph),
            orphans: analytics.orphans(),
            most_reused,
            most_dependencies,
            formulas: formulas(documents),
            fingerprint: graph.fingerprint(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot to `path` atomically.
    ///
    /// Creates the parent directory if needed.
    pub fn write_atomic(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err(path))?;
        }

        let mut contents = self.to_json()?;
        contents.push('\n');

        let temp_path = path.with_extension("json.tmp");
        if let Err(err) = Self::write_then_rename(&temp_path, path, contents.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        tracing::debug!(path = %path.display(), "registry snapshot written");
        Ok(())
    }

    fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), RegistryError> {
        let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;
        file.write_all(bytes).map_err(write_err(temp_path))?;
        file.sync_all().map_err(write_err(temp_path))?;
        drop(file);

        fs::rename(temp_path, path).map_err(write_err(path))
    }
}
