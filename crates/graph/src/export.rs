//! Node-link JSON export and import
//!
//! Serializes a dependency graph as `{directed, nodes, links}` so other
//! tools can render it. Import rebuilds the graph from node data and
//! rejects files whose links disagree with the rebuilt edges.

use crate::graph::{DependencyEdge, DependencyGraph, PaperNode};
use crate::paper::PaperBatch;
use learnpilot_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Node-link representation of a dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub nodes: Vec<PaperNode>,
    pub links: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn to_node_link(&self) -> NodeLinkGraph {
        NodeLinkGraph {
            directed: true,
            nodes: self.nodes().cloned().collect(),
            links: self.edges().to_vec(),
        }
    }

    /// Rebuild a graph from its node-link form.
    ///
    /// Edges are always derived again from the nodes; the stored links
    /// must match them exactly.
    pub fn from_node_link(data: &NodeLinkGraph) -> Result<Self> {
        if !data.directed {
            return Err(AppError::Validation {
                message: "dependency graphs are directed".to_string(),
                field: Some("directed".to_string()),
            });
        }

        let batch =
            PaperBatch::try_from_iter(data.nodes.iter().map(|node| (node.id.clone(), node.to_concepts())))?;
        let graph = DependencyGraph::build(&batch);

        if graph.edges() != data.links.as_slice() {
            return Err(AppError::Validation {
                message: format!(
                    "stored links do not match the dependencies derived from the papers ({} stored, {} derived)",
                    data.links.len(),
                    graph.edge_count()
                ),
                field: Some("links".to_string()),
            });
        }

        Ok(graph)
    }

    /// Write the node-link JSON to a file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.to_node_link())?;
        writer.flush()?;

        info!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "Dependency graph saved"
        );
        Ok(())
    }

    /// Read a graph saved with [`DependencyGraph::save_json`]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let data: NodeLinkGraph = serde_json::from_reader(reader)?;
        Self::from_node_link(&data)
    }
}
