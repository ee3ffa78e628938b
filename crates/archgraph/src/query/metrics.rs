//! Degree centrality and orphan detection.

use crate::graph::{KnowledgeGraph, Node};
use serde::Serialize;

/// In/out degree of one node.
#[derive(Debug, Clone, Serialize)]
pub struct CentralityScore<'g> {
    /// The scored node
    pub node: &'g Node,
    /// Number of incoming edges
    pub in_degree: usize,
    /// Number of outgoing edges
    pub out_degree: usize,
}

impl CentralityScore<'_> {
    /// Incoming plus outgoing edges.
    pub fn total_degree(&self) -> usize {
        self.in_degree + self.out_degree
    }
}

/// Degree of every node, read straight from the populated navigation lists.
pub fn calculate_centrality(graph: &KnowledgeGraph) -> Vec<CentralityScore<'_>> {
    graph
        .nodes()
        .map(|node| CentralityScore {
            node,
            in_degree: node.in_degree(),
            out_degree: node.out_degree(),
        })
        .collect()
}

/// Nodes with no incoming edges.
pub fn find_orphans(graph: &KnowledgeGraph) -> Vec<&Node> {
    graph.nodes().filter(|node| node.in_degree() == 0).collect()
}
