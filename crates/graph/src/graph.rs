//! Paper dependency graph
//!
//! Provides the in-memory dependency graph built from a paper batch.
//! An edge `A -> B` means A should be read before B: some of B's
//! prerequisites are concepts A covers.

use crate::paper::{PaperBatch, PaperConcepts};
use learnpilot_common::errors::{AppError, Result};
use learnpilot_common::{metrics, Difficulty};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::debug;

/// A paper in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperNode {
    /// Paper ID, unique within the batch
    pub id: String,

    /// Concepts the paper covers
    pub concepts: BTreeSet<String>,

    /// Concepts the paper assumes
    pub prerequisites: BTreeSet<String>,

    /// Informational difficulty, never affects edges
    pub difficulty: Difficulty,
}

impl PaperNode {
    /// The batch entry this node was built from
    pub fn to_concepts(&self) -> PaperConcepts {
        PaperConcepts {
            concepts: self.concepts.clone(),
            prerequisites: self.prerequisites.clone(),
            difficulty: self.difficulty,
        }
    }
}

/// Edge in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Paper to read first
    pub source: String,

    /// Paper that depends on `source`
    pub target: String,

    /// Number of target prerequisites covered by the source
    pub weight: usize,
}

/// Dependency graph for one batch.
///
/// Owns its nodes and edges. Nodes keep batch insertion order and are
/// addressed internally by that position; adjacency lists hold edge
/// positions. The graph is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGraph {
    /// Nodes in insertion order
    nodes: Vec<PaperNode>,

    /// Paper ID -> node position
    index: HashMap<String, usize>,

    /// All edges, grouped by source in insertion order
    edges: Vec<DependencyEdge>,

    /// Node position -> positions of edges leaving it
    outgoing: Vec<Vec<usize>>,

    /// Node position -> positions of edges entering it
    incoming: Vec<Vec<usize>>,

    /// Edge position -> (source node, target node)
    endpoints: Vec<(usize, usize)>,
}

/// Build the dependency graph for a batch
pub fn build_dependency_graph(batch: &PaperBatch) -> DependencyGraph {
    DependencyGraph::build(batch)
}

impl DependencyGraph {
    /// Build the graph by comparing every ordered pair of papers.
    ///
    /// For distinct papers A and B, adds `A -> B` when
    /// `|prerequisites(B) ∩ concepts(A)| > 0`, weighted by that count.
    pub fn build(batch: &PaperBatch) -> Self {
        let start = Instant::now();

        let nodes: Vec<PaperNode> = batch
            .iter()
            .map(|(id, paper)| PaperNode {
                id: id.to_string(),
                concepts: paper.concepts.clone(),
                prerequisites: paper.prerequisites.clone(),
                difficulty: paper.difficulty,
            })
            .collect();

        let mut graph = Self::with_nodes(nodes);

        for source in 0..graph.nodes.len() {
            for target in 0..graph.nodes.len() {
                if source == target {
                    continue;
                }

                let overlap = graph.nodes[target]
                    .prerequisites
                    .intersection(&graph.nodes[source].concepts)
                    .count();

                if overlap > 0 {
                    graph.push_edge(source, target, overlap);
                }
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        metrics::record_graph_build(elapsed, graph.node_count(), graph.edge_count());

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = elapsed * 1000.0,
            "Dependency graph built"
        );

        graph
    }

    /// Parse a JSON batch and build its graph
    pub fn from_json(value: &Value) -> Result<Self> {
        let batch = PaperBatch::from_json(value)?;
        Ok(Self::build(&batch))
    }

    fn with_nodes(nodes: Vec<PaperNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        let n = nodes.len();

        Self {
            nodes,
            index,
            edges: Vec::new(),
            outgoing: vec![Vec::new(); n],
            incoming: vec![Vec::new(); n],
            endpoints: Vec::new(),
        }
    }

    fn push_edge(&mut self, source: usize, target: usize, weight: usize) {
        let position = self.edges.len();
        self.edges.push(DependencyEdge {
            source: self.nodes[source].id.clone(),
            target: self.nodes[target].id.clone(),
            weight,
        });
        self.endpoints.push((source, target));
        self.outgoing[source].push(position);
        self.incoming[target].push(position);
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in batch insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &PaperNode> {
        self.nodes.iter()
    }

    /// All edges, grouped by source in insertion order
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn node(&self, paper_id: &str) -> Option<&PaperNode> {
        self.index.get(paper_id).map(|&i| &self.nodes[i])
    }

    /// Look up a node, failing with `PaperNotFound`
    pub fn require(&self, paper_id: &str) -> Result<&PaperNode> {
        self.node(paper_id).ok_or_else(|| AppError::PaperNotFound {
            id: paper_id.to_string(),
        })
    }

    pub fn contains(&self, paper_id: &str) -> bool {
        self.index.contains_key(paper_id)
    }

    /// Get the edge `source -> target`, if any
    pub fn edge(&self, source: &str, target: &str) -> Option<&DependencyEdge> {
        let s = *self.index.get(source)?;
        let t = *self.index.get(target)?;
        self.outgoing[s]
            .iter()
            .find(|&&e| self.endpoints[e].1 == t)
            .map(|&e| &self.edges[e])
    }

    /// Papers that must be read before this one (sources of incoming edges)
    pub fn dependencies(&self, paper_id: &str) -> Vec<&str> {
        self.index
            .get(paper_id)
            .map(|&i| {
                self.incoming[i]
                    .iter()
                    .map(|&e| self.edges[e].source.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Papers that build on this one (targets of outgoing edges)
    pub fn dependents(&self, paper_id: &str) -> Vec<&str> {
        self.index
            .get(paper_id)
            .map(|&i| {
                self.outgoing[i]
                    .iter()
                    .map(|&e| self.edges[e].target.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of direct prerequisite papers (incoming edges)
    pub fn in_degree(&self, paper_id: &str) -> usize {
        self.index.get(paper_id).map(|&i| self.incoming[i].len()).unwrap_or(0)
    }

    /// Number of directly dependent papers (outgoing edges)
    pub fn out_degree(&self, paper_id: &str) -> usize {
        self.index.get(paper_id).map(|&i| self.outgoing[i].len()).unwrap_or(0)
    }

    /// Papers with no incoming edges, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &PaperNode> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.incoming[*i].is_empty())
            .map(|(_, node)| node)
    }

    /// Papers with no outgoing edges, in insertion order
    pub fn leaves(&self) -> impl Iterator<Item = &PaperNode> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.outgoing[*i].is_empty())
            .map(|(_, node)| node)
    }

    /// Rebuild the batch this graph was derived from
    pub fn to_batch(&self) -> Result<PaperBatch> {
        PaperBatch::try_from_iter(self.nodes.iter().map(|node| (node.id.clone(), node.to_concepts())))
    }

    // Position-based accessors for the graph algorithms

    pub(crate) fn position(&self, paper_id: &str) -> Option<usize> {
        self.index.get(paper_id).copied()
    }

    pub(crate) fn id_at(&self, position: usize) -> &str {
        &self.nodes[position].id
    }

    pub(crate) fn node_at(&self, position: usize) -> &PaperNode {
        &self.nodes[position]
    }

    pub(crate) fn successors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.outgoing[position].iter().map(move |&e| self.endpoints[e].1)
    }

    pub(crate) fn predecessors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming[position].iter().map(move |&e| self.endpoints[e].0)
    }

    pub(crate) fn in_degree_at(&self, position: usize) -> usize {
        self.incoming[position].len()
    }

    pub(crate) fn out_degree_at(&self, position: usize) -> usize {
        self.outgoing[position].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpilot_common::errors::ErrorCode;
    use serde_json::json;

    fn paper(concepts: &[&str], prerequisites: &[&str]) -> PaperConcepts {
        PaperConcepts::new(concepts.iter().copied(), prerequisites.iter().copied())
    }

    #[test]
    fn test_graph_construction() {
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["attention"], &[])),
            ("P2", paper(&["transformer"], &["attention"])),
        ])
        .unwrap();

        let graph = build_dependency_graph(&batch);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge("P1", "P2").unwrap();
        assert_eq!(edge.weight, 1);
        assert!(graph.edge("P2", "P1").is_none());
        assert_eq!(graph.dependencies("P2"), vec!["P1"]);
        assert_eq!(graph.dependents("P1"), vec!["P2"]);
    }

    #[test]
    fn test_edge_weight_is_overlap_size() {
        let batch = PaperBatch::try_from_iter([
            ("base", paper(&["rnn", "lstm", "gru", "softmax"], &[])),
            ("seq2seq", paper(&["encoder-decoder"], &["rnn", "lstm", "beam search"])),
        ])
        .unwrap();

        let graph = build_dependency_graph(&batch);
        assert_eq!(graph.edge("base", "seq2seq").unwrap().weight, 2);
    }

    #[test]
    fn test_no_self_edges() {
        // Own concepts overlapping own prerequisites never produce a self-edge
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["attention", "rnn"], &["attention"])),
        ])
        .unwrap();

        let graph = build_dependency_graph(&batch);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.in_degree("P1"), 0);
    }

    #[test]
    fn test_edge_iff_overlap() {
        let batch = PaperBatch::try_from_iter([
            ("A", paper(&["x", "y"], &["z"])),
            ("B", paper(&["z"], &["x"])),
            ("C", paper(&["w"], &["q"])),
        ])
        .unwrap();
        let graph = build_dependency_graph(&batch);

        for a in batch.iter() {
            for b in batch.iter() {
                if a.0 == b.0 {
                    assert!(graph.edge(a.0, b.0).is_none());
                    continue;
                }
                let overlap = b.1.prerequisites.intersection(&a.1.concepts).count();
                match graph.edge(a.0, b.0) {
                    Some(edge) => assert_eq!(edge.weight, overlap),
                    None => assert_eq!(overlap, 0, "missing edge {} -> {}", a.0, b.0),
                }
            }
        }
        // A -> B and B -> A form a cycle; C is isolated
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_matching_is_exact() {
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["Attention"], &[])),
            ("P2", paper(&[], &["attention "])),
        ])
        .unwrap();
        assert_eq!(build_dependency_graph(&batch).edge_count(), 0);
    }

    #[test]
    fn test_empty_batch() {
        let graph = build_dependency_graph(&PaperBatch::new());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let batch = PaperBatch::try_from_iter([
            ("c", paper(&["k1"], &["k3"])),
            ("a", paper(&["k2"], &["k1"])),
            ("b", paper(&["k3"], &["k1", "k2"])),
        ])
        .unwrap();

        assert_eq!(build_dependency_graph(&batch), build_dependency_graph(&batch));
    }

    #[test]
    fn test_roots_and_leaves() {
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["a"], &[])),
            ("P2", paper(&["b"], &["a"])),
            ("P3", paper(&["c"], &["a"])),
        ])
        .unwrap();
        let graph = build_dependency_graph(&batch);

        let roots: Vec<&str> = graph.roots().map(|n| n.id.as_str()).collect();
        let leaves: Vec<&str> = graph.leaves().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["P1"]);
        assert_eq!(leaves, vec!["P2", "P3"]);
        assert_eq!(graph.out_degree("P1"), 2);
    }

    #[test]
    fn test_from_json_validation_names_paper() {
        let err = DependencyGraph::from_json(&json!({
            "P1": {"concepts": ["a"], "prerequisites": []},
            "P2": {"concepts": "a", "prerequisites": []},
        }))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaper);
        assert_eq!(err.paper_id(), Some("P2"));
    }

    #[test]
    fn test_require_unknown_paper() {
        let graph = build_dependency_graph(&PaperBatch::new());
        let err = graph.require("ghost").unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaperNotFound);
    }

    #[test]
    fn test_to_batch_round_trip() {
        let batch = PaperBatch::try_from_iter([
            ("P1", paper(&["a"], &[]).with_difficulty(Difficulty::Beginner)),
            ("P2", paper(&["b"], &["a"])),
        ])
        .unwrap();
        let graph = build_dependency_graph(&batch);
        let rebuilt = build_dependency_graph(&graph.to_batch().unwrap());
        assert_eq!(graph, rebuilt);
    }
}
