//! core::analytics
//!
//! Read-only statistics over a built composition graph.
//!
//! # Definitions
//!
//! - An **orphan** is a node that nothing composes, excluding the lowest
//!   and highest ranks of the ruleset (foundations and leaves are expected
//!   to be unreferenced). Nodes with an unrecognized layer are candidates.
//! - **Most composed** counts reverse edges, so dangling targets that are
//!   referenced but not loaded still rank.
//! - **Most composing** counts forward edges.
//!
//! Rankings are sorted by count descending; ties keep id order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::graph::CompositionGraph;
use super::rules::LayerRuleset;
use super::types::SkillId;

/// Key used in per-layer statistics for nodes without a declared layer.
pub const NO_LAYER: &str = "(none)";

/// A skill and a count, for rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSkill {
    pub id: SkillId,
    pub count: usize,
}

/// Per-layer document statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStats {
    /// Nodes declaring this layer
    pub count: usize,
    /// Mean outgoing compositions, rounded to one decimal
    pub avg_compositions: f64,
}

/// Everything the `stats` command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_skills: usize,
    pub composition_edges: usize,
    pub by_layer: BTreeMap<String, LayerStats>,
    pub most_composed: Vec<RankedSkill>,
    pub most_composing: Vec<RankedSkill>,
}

/// An orphan with its declared layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanEntry {
    pub id: SkillId,
    pub layer: Option<String>,
}

/// Analytics queries bound to one graph and ruleset.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    graph: &'a CompositionGraph,
    rules: &'a LayerRuleset,
}

impl<'a> Analytics<'a> {
    pub fn new(graph: &'a CompositionGraph, rules: &'a LayerRuleset) -> Self {
        Self { graph, rules }
    }

    /// Mid-rank nodes with no dependents, sorted by id.
    ///
    /// # Example
    ///
    /// ```
    /// use skillgraph::core::analytics::Analytics;
    /// use skillgraph::core::graph::{CompositionGraph, SkillNode};
    /// use skillgraph::core::rules::LayerRuleset;
    /// use skillgraph::core::types::{Layer, SkillId};
    ///
    /// let rules = LayerRuleset::builtin();
    /// let mut graph = CompositionGraph::new();
    /// let atom = SkillId::new("a-icon").unwrap();
    /// graph.add_node(SkillNode::with_layer(atom.clone(), Layer::new(1)));
    /// graph.add_node(SkillNode::with_layer(SkillId::new("p-color").unwrap(), Layer::new(0)));
    ///
    /// assert_eq!(Analytics::new(&graph, &rules).orphans(), vec![atom]);
    /// ```
    pub fn orphans(&self) -> Vec<SkillId> {
        let lowest = self.rules.lowest();
        let highest = self.rules.highest();

        self.graph
            .nodes()
            .filter(|node| match node.rank {
                Some(rank) => Some(rank) != lowest && Some(rank) != highest,
                None => true,
            })
            .filter(|node| {
                self.graph
                    .composed_by(&node.id)
                    .map_or(true, |dependents| dependents.is_empty())
            })
            .map(|node| node.id.clone())
            .collect()
    }

    /// Orphans paired with their declared layer.
    pub fn orphan_entries(&self) -> Vec<OrphanEntry> {
        self.orphans()
            .into_iter()
            .map(|id| {
                let layer = self.graph.node(&id).and_then(|n| n.layer.clone());
                OrphanEntry { id, layer }
            })
            .collect()
    }

    /// The `top_n` most reused skills, by number of composers.
    pub fn most_composed(&self, top_n: usize) -> Vec<RankedSkill> {
        rank(self.graph.reverse_entries(), top_n)
    }

    /// The `top_n` skills with the most direct dependencies.
    pub fn most_composing(&self, top_n: usize) -> Vec<RankedSkill> {
        rank(self.graph.forward_entries(), top_n)
    }

    /// Node count and mean outgoing compositions per declared layer.
    pub fn by_layer(&self) -> BTreeMap<String, LayerStats> {
        let mut totals: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for node in self.graph.nodes() {
            let key = node.layer.clone().unwrap_or_else(|| NO_LAYER.to_string());
            let out = self.graph.composes(&node.id).map_or(0, |targets| targets.len());
            let entry = totals.entry(key).or_default();
            entry.0 += 1;
            entry.1 += out;
        }

        totals
            .into_iter()
            .map(|(layer, (count, compositions))| {
                (
                    layer,
                    LayerStats {
                        count,
                        avg_compositions: round_one(compositions as f64 / count as f64),
                    },
                )
            })
            .collect()
    }

    /// Number of skills in the graph.
    pub fn total_skills(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of composition edges, dangling ones included.
    pub fn composition_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Totals, per-layer statistics and both rankings.
    pub fn stats(&self, top_n: usize) -> StatsReport {
        StatsReport {
            total_skills: self.total_skills(),
            composition_edges: self.composition_edges(),
            by_layer: self.by_layer(),
            most_composed: self.most_composed(top_n),
            most_composing: self.most_composing(top_n),
        }
    }
}

fn rank<'g, I>(entries: I, top_n: usize) -> Vec<RankedSkill>
where
    I: Iterator<Item = (&'g SkillId, &'g BTreeSet<SkillId>)>,
{
    let mut ranked: Vec<RankedSkill> = entries
        .map(|(id, set)| RankedSkill {
            id: id.clone(),
            count: set.len(),
        })
        .collect();
    // Stable: equal counts stay in id order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
