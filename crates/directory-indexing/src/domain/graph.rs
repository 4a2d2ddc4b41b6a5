//! # Directory Graph
//!
//! A directed weighted multigraph keyed by 44-character identifiers with a
//! dense `u32` index, supporting idempotent edge insertion with weight
//! accumulation, ancestor queries for cycle prevention, and iterative
//! PageRank.
//!
//! ## Invariants
//!
//! - Index 0 belongs exclusively to the root sink (`pad44("0")`); the
//!   graph is seeded with it at construction and after every reset.
//! - A node's `outbound` equals the sum of the weights of its outgoing
//!   edges.
//! - Weights accumulate as integers - every increment originates from an
//!   integer amount - and become floating point only inside the rank
//!   pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::codec::pad44;

/// Dense index reserved for the root sink.
pub const ROOT_SINK_INDEX: u32 = 0;

#[derive(Debug, Clone)]
struct GraphNode {
    pub_key: String,
    ranking: f64,
    outbound: i64,
}

/// A weighted edge; height and time record the provenance of the last
/// write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Accumulated weight across all links of this ordered pair.
    pub weight: i64,
    /// Block height of the most recent link.
    pub height: i64,
    /// Transaction (or staggered dimension) time of the most recent link.
    pub time: i64,
}

/// Result of a rank pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOutcome {
    /// Iterations executed.
    pub iterations: usize,
    /// Whether the L1 delta fell below tolerance before the iteration cap.
    pub converged: bool,
}

/// Per-directory graph over identifier space.
#[derive(Debug, Clone)]
pub struct DirectoryGraph {
    index: HashMap<String, u32>,
    nodes: Vec<GraphNode>,
    edges: HashMap<u32, HashMap<u32, GraphEdge>>,
}

impl DirectoryGraph {
    /// Create an empty graph holding only the root sink at index 0.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            edges: HashMap::new(),
        };
        graph.intern(pad44("0"));
        graph
    }

    fn intern(&mut self, key: String) -> u32 {
        if let Some(&index) = self.index.get(&key) {
            return index;
        }
        let index = self.nodes.len() as u32;
        self.nodes.push(GraphNode {
            pub_key: key.clone(),
            ranking: 0.0,
            outbound: 0,
        });
        self.index.insert(key, index);
        index
    }

    /// Create a weighted edge between a source-target pair.
    ///
    /// Both endpoints are canonicalized with [`pad44`] and interned on
    /// first sight. Repeated links of the same ordered pair accumulate
    /// weight; height and time always take the latest values. Returns the
    /// weight applied.
    pub fn link(&mut self, src: &str, tgt: &str, weight: i64, height: i64, time: i64) -> i64 {
        let source = self.intern(pad44(src));
        let target = self.intern(pad44(tgt));

        let edge = self
            .edges
            .entry(source)
            .or_default()
            .entry(target)
            .or_default();
        edge.weight += weight;
        edge.height = height;
        edge.time = time;

        self.nodes[source as usize].outbound += weight;

        weight
    }

    /// Whether `descendant` is reachable from `parent` along edges.
    ///
    /// False when either identifier is unindexed or resolves to the root
    /// sink; edges into the sink are never traversed, so the shared
    /// terminus does not collapse every pair into one ancestry.
    /// Identifiers are matched as given, without canonicalization.
    pub fn is_parent_descendant(&self, parent: &str, descendant: &str) -> bool {
        let (Some(&parent_index), Some(&descendant_index)) =
            (self.index.get(parent), self.index.get(descendant))
        else {
            return false;
        };
        if parent_index == ROOT_SINK_INDEX || descendant_index == ROOT_SINK_INDEX {
            return false;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![parent_index];
        while let Some(current) = stack.pop() {
            if current == descendant_index {
                return true;
            }
            if std::mem::replace(&mut visited[current as usize], true) {
                continue;
            }
            if let Some(targets) = self.edges.get(&current) {
                for &next in targets.keys() {
                    if next == ROOT_SINK_INDEX {
                        continue;
                    }
                    if !visited[next as usize] {
                        stack.push(next);
                    }
                }
            }
        }
        false
    }

    /// Compute the rank of every node in the graph.
    ///
    /// `damping` is the usual PageRank α; `tolerance` the L1 convergence
    /// criterion. Edge weights are normalized per source so each
    /// non-dangling row of the transition matrix sums to 1; mass held by
    /// dangling nodes is redistributed uniformly each iteration. The pass
    /// stops once the delta falls to `tolerance` or after
    /// `max_iterations`, whichever comes first.
    pub fn rank(&mut self, damping: f64, tolerance: f64, max_iterations: usize) -> RankOutcome {
        let n = self.nodes.len();
        if n == 0 {
            return RankOutcome {
                iterations: 0,
                converged: true,
            };
        }
        let inverse = 1.0 / n as f64;

        // Normalized transition rows; dangling sources have no row.
        let mut normalized: HashMap<u32, Vec<(u32, f64)>> = HashMap::new();
        for (&source, targets) in &self.edges {
            let outbound = self.nodes[source as usize].outbound;
            if outbound > 0 {
                let row = targets
                    .iter()
                    .map(|(&target, edge)| (target, edge.weight as f64 / outbound as f64))
                    .collect();
                normalized.insert(source, row);
            }
        }

        for node in &mut self.nodes {
            node.ranking = inverse;
        }

        let mut delta = 1.0f64;
        let mut iterations = 0;
        while delta > tolerance && iterations < max_iterations {
            let previous: Vec<f64> = self.nodes.iter().map(|node| node.ranking).collect();

            let mut leak = 0.0;
            for (i, node) in self.nodes.iter_mut().enumerate() {
                if node.outbound == 0 {
                    leak += previous[i];
                }
                node.ranking = 0.0;
            }
            leak *= damping;

            for source in 0..n {
                if let Some(row) = normalized.get(&(source as u32)) {
                    for &(target, weight) in row {
                        self.nodes[target as usize].ranking += damping * previous[source] * weight;
                    }
                }
                self.nodes[source].ranking += (1.0 - damping) * inverse + leak * inverse;
            }

            delta = self
                .nodes
                .iter()
                .zip(&previous)
                .map(|(node, prev)| (node.ranking - prev).abs())
                .sum();
            iterations += 1;
        }

        RankOutcome {
            iterations,
            converged: delta <= tolerance,
        }
    }

    /// Clear all graph data and re-seed the root sink.
    pub fn reset(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.edges.clear();
        self.intern(pad44("0"));
    }

    /// Number of interned nodes, root sink included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct ordered edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashMap::len).sum()
    }

    /// Dense index of a canonicalized identifier.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<u32> {
        self.index.get(&pad44(key)).copied()
    }

    /// Identifier stored at a dense index.
    #[must_use]
    pub fn key_of(&self, index: u32) -> Option<&str> {
        self.nodes
            .get(index as usize)
            .map(|node| node.pub_key.as_str())
    }

    /// Current ranking of an identifier.
    #[must_use]
    pub fn ranking(&self, key: &str) -> Option<f64> {
        let index = self.index_of(key)?;
        Some(self.nodes[index as usize].ranking)
    }

    /// Sum of the weights of edges leaving an identifier.
    #[must_use]
    pub fn outbound_weight(&self, key: &str) -> Option<i64> {
        let index = self.index_of(key)?;
        Some(self.nodes[index as usize].outbound)
    }

    /// The edge between two canonicalized identifiers, if present.
    #[must_use]
    pub fn edge(&self, src: &str, tgt: &str) -> Option<GraphEdge> {
        let source = self.index_of(src)?;
        let target = self.index_of(tgt)?;
        self.edges.get(&source)?.get(&target).copied()
    }

    /// Iterate `(identifier, ranking)` over every node.
    pub fn rankings(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.nodes
            .iter()
            .map(|node| (node.pub_key.as_str(), node.ranking))
    }

    /// Iterate `(source, target, edge)` over every edge by dense index.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, GraphEdge)> + '_ {
        self.edges.iter().flat_map(|(&source, targets)| {
            targets
                .iter()
                .map(move |(&target, &edge)| (source, target, edge))
        })
    }
}

impl Default for DirectoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Construction ==========

    #[test]
    fn test_new_graph_seeds_root_sink() {
        let graph = DirectoryGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.index_of("0"), Some(ROOT_SINK_INDEX));
    }

    #[test]
    fn test_reset_reseeds_root_sink() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 5, 1, 100);
        graph.reset();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.index_of("0"), Some(ROOT_SINK_INDEX));
    }

    // ========== Link ==========

    #[test]
    fn test_link_interns_in_first_sight_order() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 1, 1, 100);
        graph.link("b", "c", 1, 1, 100);

        assert_eq!(graph.index_of("a"), Some(1));
        assert_eq!(graph.index_of("b"), Some(2));
        assert_eq!(graph.index_of("c"), Some(3));
    }

    #[test]
    fn test_link_accumulates_weight_and_overwrites_provenance() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 5, 1, 100);
        graph.link("a", "b", 7, 2, 200);

        let edge = graph.edge("a", "b").unwrap();
        assert_eq!(edge.weight, 12);
        assert_eq!(edge.height, 2);
        assert_eq!(edge.time, 200);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_link_updates_outbound_sum() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 5, 1, 100);
        graph.link("a", "c", 7, 1, 101);
        graph.link("a", "b", 3, 1, 102);

        assert_eq!(graph.outbound_weight("a"), Some(15));
        assert_eq!(graph.outbound_weight("b"), Some(0));
    }

    #[test]
    fn test_link_canonicalizes_endpoints() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "0", 5, 1, 100);

        // "0" resolves to the seeded root sink, not a new node.
        assert_eq!(graph.node_count(), 2);
        assert!(graph.edge("a", "0").is_some());
    }

    // ========== Ancestor queries ==========

    #[test]
    fn test_parent_descendant_direct_and_transitive() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 1, 1, 100);
        graph.link("b", "c", 1, 1, 101);

        let (a, b, c) = (pad44("a"), pad44("b"), pad44("c"));
        assert!(graph.is_parent_descendant(&a, &b));
        assert!(graph.is_parent_descendant(&a, &c));
        assert!(!graph.is_parent_descendant(&c, &a));
    }

    #[test]
    fn test_parent_descendant_false_for_root_or_unknown() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 1, 1, 100);

        let (root, a) = (pad44("0"), pad44("a"));
        assert!(!graph.is_parent_descendant(&root, &a));
        assert!(!graph.is_parent_descendant(&a, &root));
        assert!(!graph.is_parent_descendant(&a, &pad44("missing")));
    }

    #[test]
    fn test_parent_descendant_does_not_traverse_the_sink() {
        let mut graph = DirectoryGraph::new();
        // Two chains meeting only at the sink.
        graph.link("a", "0", 1, 1, 100);
        graph.link("b", "0", 1, 1, 101);

        let (a, b) = (pad44("a"), pad44("b"));
        assert!(!graph.is_parent_descendant(&a, &b));
        assert!(!graph.is_parent_descendant(&b, &a));
    }

    // ========== Rank ==========

    fn ranking_sum(graph: &DirectoryGraph) -> f64 {
        graph.rankings().map(|(_, ranking)| ranking).sum()
    }

    #[test]
    fn test_rank_sums_to_one_on_chain() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 10, 1, 100);
        graph.link("b", "0", 10, 1, 101);

        let outcome = graph.rank(0.85, 1e-6, 200);
        assert!(outcome.converged);
        assert!((ranking_sum(&graph) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rank_flows_weight_toward_targets() {
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 30, 1, 100);
        graph.link("a", "c", 10, 1, 101);

        graph.rank(0.85, 1e-6, 200);
        let b = graph.ranking(&pad44("b")).unwrap();
        let c = graph.ranking(&pad44("c")).unwrap();
        assert!(b > c, "heavier edge should attract more rank: {b} vs {c}");
    }

    #[test]
    fn test_rank_pure_mass_flow_preserves_total() {
        // With damping 1.0 there is no teleport term; mass still sums to
        // one because dangling mass is redistributed each iteration.
        let mut graph = DirectoryGraph::new();
        graph.link("a", "b", 10, 1, 100);
        graph.link("b", "c", 10, 1, 101);
        graph.link("c", "0", 10, 1, 102);

        graph.rank(1.0, 1e-6, 200);
        assert!((ranking_sum(&graph) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rank_reports_iteration_cap() {
        let mut graph = DirectoryGraph::new();
        // A two-cycle under pure mass flow oscillates.
        graph.link("a", "b", 1, 1, 100);
        graph.link("b", "a", 1, 1, 101);

        let outcome = graph.rank(1.0, 1e-12, 3);
        assert_eq!(outcome.iterations, 3);
        assert!(!outcome.converged);
    }

    #[test]
    fn test_rank_single_node_graph() {
        let mut graph = DirectoryGraph::new();
        let outcome = graph.rank(1.0, 1e-6, 200);
        assert!(outcome.converged);
        assert!((ranking_sum(&graph) - 1.0).abs() < 1e-9);
    }
}
