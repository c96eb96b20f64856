//! core::graph
//!
//! Composition graph representation and operations.
//!
//! # Architecture
//!
//! The composition graph is a directed graph where:
//! - Nodes are documents that declare an identifier
//! - Forward edges point from composer to composed (`composes`)
//! - Reverse edges point from composed to composer (`composed by`)
//!
//! Edges are derived from each document's `composes` list by syntactic
//! resolution through the layer ruleset. A target does not need to exist:
//! dangling edges are recorded, and the target gets a reverse-edge entry
//! even though it has no node.
//!
//! # Invariants
//!
//! - Every node has a (possibly empty) entry in both edge maps
//! - Edges are sets: at most one edge per (composer, composed) pair
//! - The first document declaring an id owns its node; later duplicates
//!   contribute neither a node nor edges
//! - All maps are ordered, so traversals are deterministic
//!
//! The graph is rebuilt from scratch on every run.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::document::SkillDocument;
use super::rules::LayerRuleset;
use super::types::{Fingerprint, Layer, SkillId};

/// A graph node: identity and layer of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillNode {
    pub id: SkillId,
    /// Raw declared layer string
    pub layer: Option<String>,
    /// Declared layer parsed as a rank
    pub rank: Option<Layer>,
    pub name: Option<String>,
}

impl SkillNode {
    /// A node with a parsed layer and no name.
    pub fn with_layer(id: SkillId, layer: Layer) -> Self {
        Self {
            id,
            layer: Some(layer.to_string()),
            rank: Some(layer),
            name: None,
        }
    }
}

/// The composition graph derived from document metadata.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CompositionGraph {
    nodes: BTreeMap<SkillId, SkillNode>,
    edges: BTreeMap<SkillId, BTreeSet<SkillId>>,
    reverse_edges: BTreeMap<SkillId, BTreeSet<SkillId>>,
}

impl CompositionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of loaded documents.
    ///
    /// Documents without metadata or without a valid id are skipped.
    pub fn build(documents: &[SkillDocument], rules: &LayerRuleset) -> Self {
        let mut graph = Self::new();
        let mut owners = Vec::new();

        for doc in documents {
            let Some(meta) = doc.metadata.as_ref() else {
                continue;
            };
            let Some(id) = meta.skill_id() else {
                continue;
            };

            let node = SkillNode {
                id: id.clone(),
                layer: meta.layer.clone(),
                rank: meta.layer_rank(),
                name: meta.name.clone(),
            };
            if graph.add_node(node) {
                owners.push((id, meta));
            } else {
                tracing::debug!(id = %id, path = %doc.path.display(), "duplicate id ignored by graph");
            }
        }

        for (id, meta) in owners {
            for reference in meta.composes() {
                if let Some(resolved) = rules.resolve(reference) {
                    graph.add_edge(&id, resolved.id);
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "composition graph built"
        );
        graph
    }

    /// Add a node. Returns `false` (and changes nothing) if the id is
    /// already present.
    pub fn add_node(&mut self, node: SkillNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.edges.entry(node.id.clone()).or_default();
        self.reverse_edges.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Add a composition edge `from -> to`.
    ///
    /// `to` does not need to be a node.
    pub fn add_edge(&mut self, from: &SkillId, to: SkillId) {
        self.reverse_edges
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        self.edges.entry(from.clone()).or_default().insert(to);
    }

    /// Get a node by id.
    pub fn node(&self, id: &SkillId) -> Option<&SkillNode> {
        self.nodes.get(id)
    }

    /// Check whether a node exists for `id`.
    pub fn contains(&self, id: &SkillId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.values()
    }

    /// Ids this node composes.
    pub fn composes(&self, id: &SkillId) -> Option<&BTreeSet<SkillId>> {
        self.edges.get(id)
    }

    /// Ids that compose this node (present for dangling targets too).
    pub fn composed_by(&self, id: &SkillId) -> Option<&BTreeSet<SkillId>> {
        self.reverse_edges.get(id)
    }

    /// Forward-edge entries, ordered by composer id.
    pub fn forward_entries(&self) -> impl Iterator<Item = (&SkillId, &BTreeSet<SkillId>)> {
        self.edges.iter()
    }

    /// Reverse-edge entries, ordered by composed id.
    pub fn reverse_entries(&self) -> impl Iterator<Item = (&SkillId, &BTreeSet<SkillId>)> {
        self.reverse_edges.iter()
    }

    /// All edges as `(composer, composed)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&SkillId, &SkillId)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Content hash of the edge set.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(self.edges())
    }

    /// Find every cycle reachable by depth-first search.
    ///
    /// Each cycle is the path from the repeated node back to itself, e.g.
    /// `[a, b, a]`; a self-loop is `[a, a]`. Only back-edges into the
    /// active path count, so edges into fully explored nodes are never
    /// reported. The scan restarts from every unvisited node, so disjoint
    /// cycles are all found.
    ///
    /// Traversal uses an explicit frame stack and is deterministic for a
    /// given graph.
    ///
    /// # Example
    ///
    /// ```
    /// use skillgraph::core::graph::{CompositionGraph, SkillNode};
    /// use skillgraph::core::types::{Layer, SkillId};
    ///
    /// let a = SkillId::new("m-a").unwrap();
    /// let b = SkillId::new("m-b").unwrap();
    ///
    /// let mut graph = CompositionGraph::new();
    /// graph.add_node(SkillNode::with_layer(a.clone(), Layer::new(2)));
    /// graph.add_node(SkillNode::with_layer(b.clone(), Layer::new(2)));
    /// graph.add_edge(&a, b.clone());
    /// graph.add_edge(&b, a.clone());
    ///
    /// assert_eq!(graph.find_cycles(), vec![vec![a.clone(), b, a]]);
    /// ```
    pub fn find_cycles(&self) -> Vec<Vec<SkillId>> {
        let empty = BTreeSet::new();
        let neighbors_of = |id: &SkillId| self.edges.get(id).unwrap_or(&empty).iter();

        let mut cycles = Vec::new();
        let mut visited: HashSet<&SkillId> = HashSet::new();
        let mut on_path: HashSet<&SkillId> = HashSet::new();
        let mut path: Vec<&SkillId> = Vec::new();

        for start in self.nodes.keys() {
            if visited.contains(start) {
                continue;
            }

            visited.insert(start);
            on_path.insert(start);
            path.push(start);
            let mut stack = vec![(start, neighbors_of(start))];

            while let Some(frame) = stack.last_mut() {
                let current = frame.0;
                match frame.1.next() {
                    Some(next) if !visited.contains(next) => {
                        visited.insert(next);
                        on_path.insert(next);
                        path.push(next);
                        stack.push((next, neighbors_of(next)));
                    }
                    Some(next) if on_path.contains(next) => {
                        if let Some(begin) = path.iter().position(|n| *n == next) {
                            let mut cycle: Vec<SkillId> =
                                path[begin..].iter().map(|n| (*n).clone()).collect();
                            cycle.push(next.clone());
                            cycles.push(cycle);
                        }
                    }
                    Some(_) => {}
                    None => {
                        stack.pop();
                        path.pop();
                        on_path.remove(current);
                    }
                }
            }
        }

        if !cycles.is_empty() {
            tracing::debug!(count = cycles.len(), "composition cycles found");
        }
        cycles
    }
}
