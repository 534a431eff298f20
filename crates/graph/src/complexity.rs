//! Complexity analysis
//!
//! Scores how demanding a paper is from its concept breadth and its
//! position in the dependency graph:
//!
//! ```text
//! score = 0.3 * concepts + 0.4 * prerequisites + 0.2 * dependencies + 0.1 * path
//! ```
//!
//! `path` is the longest chain of dependency edges from a root paper that
//! never revisits a paper.

use crate::graph::DependencyGraph;
use learnpilot_common::errors::{AppError, Result};
use learnpilot_common::metrics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// Score weights in tenths so that scores are exact multiples of 0.1
const CONCEPT_WEIGHT: usize = 3;
const PREREQUISITE_WEIGHT: usize = 4;
const DEPENDENCY_WEIGHT: usize = 2;
const PATH_WEIGHT: usize = 1;

/// Scores up to this value are low
pub const LOW_THRESHOLD: f64 = 5.0;

/// Scores above `LOW_THRESHOLD` up to this value are medium
pub const MEDIUM_THRESHOLD: f64 = 15.0;

/// Coarse complexity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Bucket a score: low ≤ 5 < medium ≤ 15 < high
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_THRESHOLD {
            ComplexityLevel::Low
        } else if score <= MEDIUM_THRESHOLD {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complexity of one paper within its batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    /// Direct prerequisite papers (in-degree)
    pub dependency_count: usize,

    /// Papers that directly depend on this one (out-degree)
    pub dependent_count: usize,

    pub concept_count: usize,

    pub prerequisite_count: usize,

    /// Longest root-to-paper path, in edges
    pub path_complexity: usize,

    pub complexity_score: f64,

    pub complexity_level: ComplexityLevel,

    /// Advisory 1-based slot in a linear curriculum
    pub recommended_reading_position: usize,
}

/// Composite score from the four graph measures
pub fn complexity_score(
    concept_count: usize,
    prerequisite_count: usize,
    dependency_count: usize,
    path_complexity: usize,
) -> f64 {
    let tenths = CONCEPT_WEIGHT * concept_count
        + PREREQUISITE_WEIGHT * prerequisite_count
        + DEPENDENCY_WEIGHT * dependency_count
        + PATH_WEIGHT * path_complexity;
    tenths as f64 / 10.0
}

/// Complexity analyzer for one graph.
///
/// Longest paths are computed once on construction and shared by every
/// paper analyzed afterwards.
pub struct ComplexityAnalyzer<'g> {
    graph: &'g DependencyGraph,
    path_lengths: Vec<usize>,
}

impl<'g> ComplexityAnalyzer<'g> {
    /// Create a new analyzer
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            path_lengths: longest_root_paths(graph),
        }
    }

    /// Analyze a single paper
    pub fn analyze(&self, paper_id: &str) -> Result<ComplexityReport> {
        let v = self
            .graph
            .position(paper_id)
            .ok_or_else(|| AppError::PaperNotFound {
                id: paper_id.to_string(),
            })?;
        let report = self.report_at(v);
        metrics::record_complexity_analyses(1, report.complexity_level.as_str());
        Ok(report)
    }

    /// Analyze every paper, in batch order
    pub fn analyze_all(&self) -> Vec<(String, ComplexityReport)> {
        let reports: Vec<(String, ComplexityReport)> = self
            .graph
            .nodes()
            .enumerate()
            .map(|(v, node)| (node.id.clone(), self.report_at(v)))
            .collect();

        let mut by_level: HashMap<ComplexityLevel, usize> = HashMap::new();
        for (_, report) in &reports {
            *by_level.entry(report.complexity_level).or_default() += 1;
        }
        for (level, count) in by_level {
            metrics::record_complexity_analyses(count, level.as_str());
        }

        reports
    }

    /// Longest root-to-paper path for a paper, if it is in the graph
    pub fn path_complexity(&self, paper_id: &str) -> Option<usize> {
        self.graph.position(paper_id).map(|v| self.path_lengths[v])
    }

    /// Deepest path in the graph
    pub fn max_path_complexity(&self) -> usize {
        self.path_lengths.iter().copied().max().unwrap_or(0)
    }

    fn report_at(&self, v: usize) -> ComplexityReport {
        let node = self.graph.node_at(v);
        let concept_count = node.concepts.len();
        let prerequisite_count = node.prerequisites.len();

        let dependency_count = self.graph.in_degree_at(v);
        let dependent_count = self.graph.out_degree_at(v);
        let path_complexity = self.path_lengths[v];

        let complexity_score =
            complexity_score(concept_count, prerequisite_count, dependency_count, path_complexity);

        ComplexityReport {
            dependency_count,
            dependent_count,
            concept_count,
            prerequisite_count,
            path_complexity,
            complexity_score,
            complexity_level: ComplexityLevel::from_score(complexity_score),
            recommended_reading_position: path_complexity + 1,
        }
    }
}

/// Analyze a single paper's complexity
pub fn analyze_complexity(graph: &DependencyGraph, paper_id: &str) -> Result<ComplexityReport> {
    ComplexityAnalyzer::new(graph).analyze(paper_id)
}

/// Analyze every paper's complexity, in batch order
pub fn analyze_all(graph: &DependencyGraph) -> Vec<(String, ComplexityReport)> {
    ComplexityAnalyzer::new(graph).analyze_all()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Active,
    Done,
}

/// Longest simple path, in edges, from any root to each node.
///
/// A depth-first search from every root (batch order, successors in edge
/// order) drops each edge that points back to a paper still on the search
/// stack. The edges that remain form an acyclic graph whose paths are all
/// simple paths of the original, and the longest of them is measured per
/// node. Nodes no root can reach get 0. On an acyclic graph nothing is
/// dropped and this is the exact longest path.
pub(crate) fn longest_root_paths(graph: &DependencyGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut visit = vec![Visit::Unseen; n];
    let mut kept: Vec<Vec<usize>> = vec![Vec::new(); n];

    for root in (0..n).filter(|&v| graph.in_degree_at(v) == 0) {
        visit[root] = Visit::Active;
        // (node, successors, next successor to look at)
        let mut stack: Vec<(usize, Vec<usize>, usize)> =
            vec![(root, graph.successors(root).collect(), 0)];

        while let Some((v, successors, next)) = stack.last_mut() {
            let v = *v;
            if *next == successors.len() {
                visit[v] = Visit::Done;
                stack.pop();
                continue;
            }

            let w = successors[*next];
            *next += 1;

            match visit[w] {
                // Closes a cycle
                Visit::Active => {}
                Visit::Done => kept[v].push(w),
                Visit::Unseen => {
                    kept[v].push(w);
                    visit[w] = Visit::Active;
                    stack.push((w, graph.successors(w).collect(), 0));
                }
            }
        }
    }

    // Longest path over the kept edges, relaxing in topological order
    let mut pending = vec![0usize; n];
    for targets in &kept {
        for &w in targets {
            pending[w] += 1;
        }
    }

    let mut depth = vec![0usize; n];
    let mut ready: Vec<usize> = (0..n)
        .filter(|&v| visit[v] == Visit::Done && pending[v] == 0)
        .collect();

    while let Some(v) = ready.pop() {
        for &w in &kept[v] {
            depth[w] = depth[w].max(depth[v] + 1);
            pending[w] -= 1;
            if pending[w] == 0 {
                ready.push(w);
            }
        }
    }

    depth
}
