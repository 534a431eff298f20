//! Reading order resolution
//!
//! Kahn's algorithm over the dependency graph. Among papers that are ready
//! at the same time, the one inserted first into the batch goes first, so
//! the order is reproducible. When a cycle blocks the sort the papers are
//! returned in insertion order and the result is flagged as unresolved.

use crate::cycles::find_cycles;
use crate::graph::DependencyGraph;
use learnpilot_common::metrics;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, warn};

/// Resolved reading order for a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingOrder {
    /// Paper IDs, earliest first
    pub order: Vec<String>,

    /// False when a cycle forced the insertion-order fallback
    pub is_valid_topological_order: bool,

    /// Papers that form cycles, empty when the order is valid
    pub cycles: Vec<Vec<String>>,
}

impl ReadingOrder {
    /// Split into `(order, is_valid_topological_order)`
    pub fn into_parts(self) -> (Vec<String>, bool) {
        (self.order, self.is_valid_topological_order)
    }

    /// Zero-based position of a paper in the order
    pub fn position(&self, paper_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == paper_id)
    }

    /// Check that the order lists every paper exactly once and that every
    /// edge points forward
    pub fn verify(&self, graph: &DependencyGraph) -> bool {
        if self.order.len() != graph.node_count() {
            return false;
        }

        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(self.order.len());
        for (i, id) in self.order.iter().enumerate() {
            if !graph.contains(id) || positions.insert(id.as_str(), i).is_some() {
                return false;
            }
        }

        graph
            .edges()
            .iter()
            .all(|edge| positions[edge.source.as_str()] < positions[edge.target.as_str()])
    }
}

/// Resolve the reading order for a graph
pub fn get_reading_order(graph: &DependencyGraph) -> ReadingOrder {
    let order = match topological_positions(graph) {
        Some(positions) => {
            debug!(papers = positions.len(), "Reading order resolved");
            ReadingOrder {
                order: positions
                    .into_iter()
                    .map(|v| graph.id_at(v).to_string())
                    .collect(),
                is_valid_topological_order: true,
                cycles: Vec::new(),
            }
        }
        None => {
            let cycles = find_cycles(graph);
            warn!(
                cycles = ?cycles,
                papers = graph.node_count(),
                "Circular dependencies between papers, falling back to batch order"
            );
            ReadingOrder {
                order: graph.nodes().map(|n| n.id.clone()).collect(),
                is_valid_topological_order: false,
                cycles,
            }
        }
    };

    metrics::record_reading_order(order.is_valid_topological_order);
    order
}

/// Kahn's algorithm, smallest insertion position first.
///
/// Returns `None` if some nodes never reach in-degree zero.
pub(crate) fn topological_positions(graph: &DependencyGraph) -> Option<Vec<usize>> {
    let n = graph.node_count();
    let mut remaining: Vec<usize> = (0..n).map(|v| graph.in_degree_at(v)).collect();

    let mut ready: BinaryHeap<Reverse<usize>> = remaining
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(v, _)| Reverse(v))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(v)) = ready.pop() {
        order.push(v);
        for w in graph.successors(v) {
            remaining[w] -= 1;
            if remaining[w] == 0 {
                ready.push(Reverse(w));
            }
        }
    }

    (order.len() == n).then_some(order)
}
