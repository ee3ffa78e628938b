//! Integration tests for the knowledge graph container: indexes and navigation.

use archgraph::graph::keys;
use archgraph::{Edge, EdgeType, GraphError, KnowledgeGraph, Node, NodeType};

fn class(id: &str, namespace: &str) -> Node {
    Node::new(id, id, NodeType::Class).with_property(keys::NAMESPACE, namespace)
}

fn sample() -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    graph.add_node(class("A", "Shop.Web"));
    graph.add_node(class("B", "Shop.Core"));
    graph.add_node(Node::new("T", "Orders", NodeType::Table));
    graph.add_edge(Edge::new("ab", "A", "B", EdgeType::DependsOn));
    graph.add_edge(Edge::new("bt", "B", "T", EdgeType::NameMatch));
    graph
}

fn ids<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<&'a str> {
    let mut ids: Vec<&str> = nodes.map(|n| n.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_lookups_after_indexing() {
    let mut graph = sample();
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(ids(graph.get_nodes_by_type(NodeType::Class)), vec!["A", "B"]);
    assert_eq!(ids(graph.get_nodes_by_namespace("Shop.Web")), vec!["A"]);
    assert_eq!(graph.get_edges_by_source("A").count(), 1);
    assert_eq!(graph.get_edges_by_target("T").count(), 1);
}

#[test]
fn test_absent_keys_return_empty() {
    let mut graph = sample();
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    assert!(graph.get_node_by_id("nope").is_none());
    assert!(graph.get_edge_by_id("nope").is_none());
    assert_eq!(graph.get_nodes_by_type(NodeType::View).count(), 0);
    assert_eq!(graph.get_nodes_by_namespace("Nowhere").count(), 0);
    assert_eq!(graph.get_edges_by_source("nope").count(), 0);
    assert_eq!(graph.get_edges_by_target("nope").count(), 0);
}

#[test]
fn test_navigation_resolves_endpoints() {
    let mut graph = sample();
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    let b = graph.get_node_by_id("B").unwrap();
    assert_eq!(b.in_degree(), 1);
    assert_eq!(b.out_degree(), 1);

    let inbound: Vec<&str> = graph.inbound(b).map(|e| e.id.as_str()).collect();
    assert_eq!(inbound, vec!["ab"]);

    let edge = graph.get_edge_by_id("bt").unwrap();
    assert_eq!(graph.source_of(edge).unwrap().id, "B");
    assert_eq!(graph.target_of(edge).unwrap().node_type, NodeType::Table);
}

#[test]
fn test_navigation_requires_indexes() {
    let mut graph = sample();

    assert!(matches!(
        graph.populate_navigation(),
        Err(GraphError::InvalidOperation { .. })
    ));
}

#[test]
fn test_build_twice_is_idempotent() {
    let mut graph = sample();
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    let snapshot = |g: &KnowledgeGraph| {
        g.nodes()
            .map(|n| {
                let inbound: Vec<String> = g.inbound(n).map(|e| e.id.clone()).collect();
                let outbound: Vec<String> = g.outbound(n).map(|e| e.id.clone()).collect();
                (n.id.clone(), inbound, outbound)
            })
            .collect::<Vec<_>>()
    };
    let first = snapshot(&graph);
    let first_by_type: Vec<String> = ids(graph.get_nodes_by_type(NodeType::Class)).into_iter().map(String::from).collect();

    graph.build_indexes();
    graph.populate_navigation().unwrap();

    assert_eq!(snapshot(&graph), first);
    assert_eq!(ids(graph.get_nodes_by_type(NodeType::Class)), first_by_type);
}

#[test]
fn test_additions_invalidate_and_rebuild() {
    let mut graph = sample();
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    graph.add_node(class("C", "Shop.Web"));
    assert!(!graph.is_indexed());
    assert!(!graph.is_navigable());

    graph.build_indexes();
    graph.populate_navigation().unwrap();
    assert_eq!(ids(graph.get_nodes_by_namespace("Shop.Web")), vec!["A", "C"]);
}

#[test]
fn test_duplicate_node_is_last_writer_wins() {
    let mut graph = sample();
    graph.add_node(Node::new("A", "Renamed", NodeType::Interface));
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    assert_eq!(graph.node_count(), 3);
    let a = graph.get_node_by_id("A").unwrap();
    assert_eq!(a.name, "Renamed");
    assert_eq!(graph.get_nodes_by_type(NodeType::Interface).count(), 1);
    assert_eq!(a.out_degree(), 1);
}

#[test]
fn test_dangling_edge_is_kept_unresolved() {
    let mut graph = sample();
    graph.add_edge(Edge::new("ax", "A", "ghost", EdgeType::Calls));
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    let edge = graph.get_edge_by_id("ax").unwrap();
    assert!(!edge.is_resolved());
    assert!(graph.target_of(edge).is_none());
    assert_eq!(graph.source_of(edge).unwrap().id, "A");
    assert_eq!(graph.get_edges_by_target("ghost").count(), 1);
}

#[test]
fn test_edge_confidence_defaults_and_clamps() {
    assert_eq!(Edge::new("e", "a", "b", EdgeType::Calls).confidence(), 1.0);
    assert_eq!(
        Edge::new("e", "a", "b", EdgeType::NameMatch)
            .with_confidence(1.7)
            .confidence(),
        1.0
    );
    assert_eq!(
        Edge::new("e", "a", "b", EdgeType::NameMatch)
            .with_confidence(-0.2)
            .confidence(),
        0.0
    );
}
