//! Convenience helpers for assembling graphs by hand.
//!
//! Snapshots are the normal input, but tests, benchmarks and embedding tools often
//! need a small graph without going through [`GraphBuilder`](crate::GraphBuilder).
//! Edge ids are derived as `from->to:EdgeType`, so adding the same relationship
//! twice replaces it instead of duplicating it.
//!
//! The helpers only add nodes and edges; call
//! [`build_indexes`](KnowledgeGraph::build_indexes) and
//! [`populate_navigation`](KnowledgeGraph::populate_navigation) when done.

use crate::graph::{keys, Edge, EdgeType, KnowledgeGraph, Node, NodeType};

/// Add a public class node in `namespace`.
///
/// # Arguments
///
/// * `graph` - The graph to add the type to
/// * `id` - Node id
/// * `name` - Simple type name (e.g. "OrderService")
/// * `namespace` - Containing namespace; empty for none
///
/// # Returns
///
/// The id of the new node.
pub fn add_type(graph: &mut KnowledgeGraph, id: &str, name: &str, namespace: &str) -> String {
    let mut node = Node::new(id, name, NodeType::Class).with_property(keys::IS_PUBLIC, true);
    if !namespace.is_empty() {
        node.set_property(keys::NAMESPACE, namespace);
    }
    graph.add_node(node);
    id.to_string()
}

/// Add a member node and a Contains edge from its declaring type.
///
/// The member inherits the namespace of `type_id` when that node is already present.
///
/// # Arguments
///
/// * `graph` - The graph
/// * `type_id` - Id of the declaring type
/// * `id` - Member node id
/// * `name` - Member name
/// * `node_type` - Member kind (Method, Property, Field, Event)
///
/// # Returns
///
/// The id of the new member node.
pub fn add_member(
    graph: &mut KnowledgeGraph,
    type_id: &str,
    id: &str,
    name: &str,
    node_type: NodeType,
) -> String {
    let namespace = graph
        .get_node_by_id(type_id)
        .and_then(Node::namespace)
        .map(str::to_string);

    let mut node = Node::new(id, name, node_type);
    if let Some(namespace) = namespace {
        node.set_property(keys::NAMESPACE, namespace);
    }
    graph.add_node(node);
    add_link(graph, type_id, id, EdgeType::Contains);
    id.to_string()
}

/// Add a DependsOn edge.
///
/// # Returns
///
/// The id of the created edge.
pub fn add_dependency(graph: &mut KnowledgeGraph, from_id: &str, to_id: &str) -> String {
    add_link(graph, from_id, to_id, EdgeType::DependsOn)
}

/// Add an edge of any type between two node ids.
///
/// The endpoints do not have to exist yet; an edge whose endpoint never appears
/// stays dangling.
///
/// # Returns
///
/// The id of the created edge.
pub fn add_link(graph: &mut KnowledgeGraph, from_id: &str, to_id: &str, edge_type: EdgeType) -> String {
    let id = format!("{from_id}->{to_id}:{edge_type}");
    graph.add_edge(Edge::new(id.clone(), from_id, to_id, edge_type));
    id
}

/// Nodes that `node_id` has a DependsOn edge to.
pub fn dependencies_of<'g>(graph: &'g KnowledgeGraph, node_id: &str) -> Vec<&'g Node> {
    let Some(node) = graph.get_node_by_id(node_id) else {
        return Vec::new();
    };
    graph
        .outbound(node)
        .filter(|edge| edge.edge_type == EdgeType::DependsOn)
        .filter_map(|edge| graph.target_of(edge))
        .collect()
}

/// Nodes with a DependsOn edge to `node_id`.
pub fn dependents_of<'g>(graph: &'g KnowledgeGraph, node_id: &str) -> Vec<&'g Node> {
    let Some(node) = graph.get_node_by_id(node_id) else {
        return Vec::new();
    };
    graph
        .inbound(node)
        .filter(|edge| edge.edge_type == EdgeType::DependsOn)
        .filter_map(|edge| graph.source_of(edge))
        .collect()
}
