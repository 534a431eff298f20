//! Graph statistics
//!
//! Batch-level summary of a dependency graph for reports.

use crate::complexity::ComplexityAnalyzer;
use crate::graph::DependencyGraph;
use crate::ordering::topological_positions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Summary measures of a dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,

    /// `edges / (n * (n - 1))`, 0 for fewer than two papers
    pub density: f64,

    /// Every paper linked to every other ignoring edge direction
    pub is_weakly_connected: bool,

    /// Number of weakly connected components
    pub component_count: usize,

    /// Mean local clustering coefficient, edges taken as undirected
    pub avg_clustering: f64,

    /// Papers with no prerequisite papers, in batch order
    pub roots: Vec<String>,

    /// Papers no other paper builds on, in batch order
    pub leaves: Vec<String>,

    /// Deepest root-to-paper path, in edges
    pub max_depth: usize,

    pub is_acyclic: bool,
}

impl GraphStats {
    /// Compute statistics for a graph
    pub fn compute(graph: &DependencyGraph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let density = if node_count > 1 {
            edge_count as f64 / (node_count * (node_count - 1)) as f64
        } else {
            0.0
        };

        let component_count = weak_component_count(graph);

        Self {
            node_count,
            edge_count,
            density,
            is_weakly_connected: component_count == 1,
            component_count,
            avg_clustering: average_clustering(graph),
            roots: graph.roots().map(|n| n.id.clone()).collect(),
            leaves: graph.leaves().map(|n| n.id.clone()).collect(),
            max_depth: ComplexityAnalyzer::new(graph).max_path_complexity(),
            is_acyclic: topological_positions(graph).is_some(),
        }
    }
}

/// Union-find over node positions, edges taken as undirected
fn weak_component_count(graph: &DependencyGraph) -> usize {
    fn find(parent: &mut [usize], mut v: usize) -> usize {
        while parent[v] != v {
            parent[v] = parent[parent[v]];
            v = parent[v];
        }
        v
    }

    let n = graph.node_count();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut components = n;

    for u in 0..n {
        for v in graph.successors(u) {
            let (ru, rv) = (find(&mut parent, u), find(&mut parent, v));
            if ru != rv {
                parent[ru.max(rv)] = ru.min(rv);
                components -= 1;
            }
        }
    }

    components
}

/// Average over all papers of the fraction of neighbor pairs that are
/// themselves linked, on the undirected view of the graph. Papers with
/// fewer than two neighbors count as 0.
fn average_clustering(graph: &DependencyGraph) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }

    let mut neighbors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for u in 0..n {
        for v in graph.successors(u) {
            neighbors[u].insert(v);
            neighbors[v].insert(u);
        }
    }

    let total: f64 = neighbors
        .iter()
        .map(|adjacent| {
            let degree = adjacent.len();
            if degree < 2 {
                return 0.0;
            }
            let members: Vec<usize> = adjacent.iter().copied().collect();
            let mut links = 0usize;
            for (i, &a) in members.iter().enumerate() {
                links += members[i + 1..]
                    .iter()
                    .filter(|&&b| neighbors[a].contains(&b))
                    .count();
            }
            (2 * links) as f64 / (degree * (degree - 1)) as f64
        })
        .sum();

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_dependency_graph;
    use crate::paper::{PaperBatch, PaperConcepts};

    fn paper(concepts: &[&str], prerequisites: &[&str]) -> PaperConcepts {
        PaperConcepts::new(concepts.iter().copied(), prerequisites.iter().copied())
    }

    #[test]
    fn test_empty_graph_stats() {
        let stats = GraphStats::compute(&build_dependency_graph(&PaperBatch::new()));
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.component_count, 0);
        assert!(!stats.is_weakly_connected);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.avg_clustering, 0.0);
        assert!(stats.is_acyclic);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn test_chain_stats() {
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["a"], &[])),
            ("P2", paper(&["b"], &["a"])),
            ("P3", paper(&["c"], &["b"])),
        ])
        .unwrap();
        let stats = GraphStats::compute(&build_dependency_graph(&batch));

        assert_eq!(stats.edge_count, 2);
        assert!((stats.density - 2.0 / 6.0).abs() < 1e-12);
        assert!(stats.is_weakly_connected);
        assert_eq!(stats.component_count, 1);
        assert_eq!(stats.roots, vec!["P1"]);
        assert_eq!(stats.leaves, vec!["P3"]);
        assert_eq!(stats.max_depth, 2);
        assert!(stats.is_acyclic);
        assert_eq!(stats.avg_clustering, 0.0);
    }

    #[test]
    fn test_average_clustering() {
        // a -> b, a -> c, b -> c form a triangle; d hangs off a
        let triangle = PaperBatch::try_from_iter([
            ("a", paper(&["x"], &[])),
            ("b", paper(&["y"], &["x"])),
            ("c", paper(&["z"], &["x", "y"])),
        ])
        .unwrap();
        let stats = GraphStats::compute(&build_dependency_graph(&triangle));
        assert_eq!(stats.avg_clustering, 1.0);

        let with_tail = PaperBatch::try_from_iter([
            ("a", paper(&["x"], &[])),
            ("b", paper(&["y"], &["x"])),
            ("c", paper(&["z"], &["x", "y"])),
            ("d", paper(&["w"], &["x"])),
        ])
        .unwrap();
        let stats = GraphStats::compute(&build_dependency_graph(&with_tail));
        // a: 1 of 3 pairs, b: 1, c: 1, d: one neighbor
        assert!((stats.avg_clustering - (1.0 / 3.0 + 2.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_reciprocal_edges_count_once() {
        let batch = PaperBatch::try_from_iter([
            ("A", paper(&["x"], &["y"])),
            ("B", paper(&["y"], &["x", "z"])),
            ("C", paper(&["z"], &["x"])),
        ])
        .unwrap();
        let stats = GraphStats::compute(&build_dependency_graph(&batch));
        // Undirected triangle A-B-C despite A <-> B
        assert_eq!(stats.avg_clustering, 1.0);
    }

    #[test]
    fn test_disconnected_with_cycle() {
        let batch = PaperBatch::try_from_iter([
            ("A", paper(&["x"], &["y"])),
            ("B", paper(&["y"], &["x"])),
            ("C", paper(&["z"], &[])),
        ])
        .unwrap();
        let stats = GraphStats::compute(&build_dependency_graph(&batch));

        assert_eq!(stats.component_count, 2);
        assert!(!stats.is_weakly_connected);
        assert!(!stats.is_acyclic);
        assert_eq!(stats.roots, vec!["C"]);
    }
}
