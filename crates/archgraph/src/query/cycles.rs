//! Dependency cycle detection.

use crate::deadline::Deadline;
use crate::error::Result;
use crate::graph::{KnowledgeGraph, Node, Severity};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// Separator used in cycle signatures.
const SIGNATURE_SEPARATOR: &str = "|";

/// A closed chain of outbound edges, in DFS discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct GraphCycle<'g> {
    /// Nodes on the cycle; the last one has an edge back to the first
    pub nodes: Vec<&'g Node>,
    /// Derived from repository and namespace diversity
    pub severity: Severity,
}

impl<'g> GraphCycle<'g> {
    fn new(nodes: Vec<&'g Node>) -> Self {
        let severity = classify_severity(&nodes);
        Self { nodes, severity }
    }

    /// Number of nodes on the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the cycle has no nodes (never true for detected cycles).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of the nodes on the cycle, in cycle order.
    pub fn node_ids(&self) -> Vec<&'g str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    /// Whether the node with `id` lies on this cycle.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Canonical signature: sorted node ids joined by `|`.
    ///
    /// Rotation and edge identity are ignored, so two distinct cycles over the same
    /// node set share a signature.
    pub fn signature(&self) -> String {
        let mut ids = self.node_ids();
        ids.sort_unstable();
        ids.join(SIGNATURE_SEPARATOR)
    }
}

/// Error when the cycle spans repositories, Warning when it spans namespaces,
/// Info otherwise. Missing tags count as the empty tag.
pub fn classify_severity(nodes: &[&Node]) -> Severity {
    let repositories: HashSet<&str> = nodes
        .iter()
        .map(|node| node.repository().unwrap_or_default())
        .collect();
    if repositories.len() > 1 {
        return Severity::Error;
    }

    let namespaces: HashSet<&str> = nodes
        .iter()
        .map(|node| node.namespace().unwrap_or_default())
        .collect();
    if namespaces.len() > 1 {
        return Severity::Warning;
    }

    Severity::Info
}

/// A DFS frame: the node being expanded and its resolved outbound targets.
struct Frame<'g> {
    targets: Vec<&'g Node>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g KnowledgeGraph, node: &'g Node) -> Self {
        Self {
            targets: graph
                .outbound(node)
                .filter_map(|edge| graph.target_of(edge))
                .collect(),
            next: 0,
        }
    }
}

/// Find cycles with an iterative white/gray/black DFS over outbound edges.
///
/// Every back edge to a node still on the DFS path yields one cycle: the path from
/// that node to the top of the stack. Dangling edges are skipped.
pub fn find_cycles<'g>(graph: &'g KnowledgeGraph, deadline: Deadline) -> Result<Vec<GraphCycle<'g>>> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for root in graph.nodes() {
        if visited.contains(root.id.as_str()) {
            continue;
        }

        let mut path: Vec<&Node> = vec![root];
        let mut on_path: HashSet<&str> = HashSet::from([root.id.as_str()]);
        let mut frames = vec![Frame::new(graph, root)];
        visited.insert(root.id.as_str());

        while let Some(frame) = frames.last_mut() {
            let Some(&target) = frame.targets.get(frame.next) else {
                frames.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done.id.as_str());
                }
                continue;
            };
            frame.next += 1;

            if on_path.contains(target.id.as_str()) {
                if let Some(start) = path.iter().rposition(|node| node.id == target.id) {
                    cycles.push(GraphCycle::new(path[start..].to_vec()));
                }
            } else if visited.insert(target.id.as_str()) {
                deadline.check("find_cycles")?;
                path.push(target);
                on_path.insert(target.id.as_str());
                frames.push(Frame::new(graph, target));
            }
        }
    }

    debug!("Found {} cycles in {} nodes", cycles.len(), graph.node_count());
    Ok(cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{keys, NodeType};

    fn node(id: &str, namespace: &str, repository: &str) -> Node {
        Node::new(id, id, NodeType::Class)
            .with_property(keys::NAMESPACE, namespace)
            .with_property(keys::REPOSITORY, repository)
    }

    #[test]
    fn test_severity_single_namespace_is_info() {
        let (a, b) = (node("A", "App", "r1"), node("B", "App", "r1"));
        assert_eq!(classify_severity(&[&a, &b]), Severity::Info);
    }

    #[test]
    fn test_severity_cross_namespace_is_warning() {
        let (a, b) = (node("A", "App.Web", "r1"), node("B", "App.Data", "r1"));
        assert_eq!(classify_severity(&[&a, &b]), Severity::Warning);
    }

    #[test]
    fn test_severity_cross_repository_is_error() {
        let (a, b) = (node("A", "App", "r1"), node("B", "App", "r2"));
        assert_eq!(classify_severity(&[&a, &b]), Severity::Error);
    }

    #[test]
    fn test_signature_ignores_rotation() {
        let (a, b, c) = (node("A", "", ""), node("B", "", ""), node("C", "", ""));
        let first = GraphCycle::new(vec![&a, &b, &c]);
        let rotated = GraphCycle::new(vec![&c, &a, &b]);

        assert_eq!(first.signature(), "A|B|C");
        assert_eq!(first.signature(), rotated.signature());
    }
}
