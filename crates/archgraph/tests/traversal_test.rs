//! Integration tests for breadth-first traversal, centrality and orphans.

use archgraph::{helpers, Direction, EngineConfig, GraphError, KnowledgeGraph, QueryEngine};
use std::collections::BTreeSet;

fn build(nodes: &[&str], edges: &[(&str, &str)]) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    for id in nodes {
        helpers::add_type(&mut graph, id, id, "");
    }
    for (from, to) in edges {
        helpers::add_dependency(&mut graph, from, to);
    }
    graph.build_indexes();
    graph.populate_navigation().unwrap();
    graph
}

fn chain() -> KnowledgeGraph {
    build(&["A", "B", "C"], &[("A", "B"), ("B", "C")])
}

fn level_ids(result: &archgraph::TraversalResult<'_>, depth: usize) -> BTreeSet<String> {
    result
        .level(depth)
        .map(|level| level.hits.iter().map(|hit| hit.node.id.clone()).collect())
        .unwrap_or_default()
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_outbound_chain() {
    let graph = chain();
    let result = QueryEngine::new(&graph)
        .traverse("A", Direction::Outbound, 3)
        .unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(level_ids(&result, 1), set(&["B"]));
    assert_eq!(level_ids(&result, 2), set(&["C"]));
    assert_eq!(result.start.unwrap().id, "A");
}

#[test]
fn test_inbound_chain() {
    let graph = chain();
    let result = QueryEngine::new(&graph)
        .traverse("C", Direction::Inbound, 3)
        .unwrap();

    assert_eq!(level_ids(&result, 1), set(&["B"]));
    assert_eq!(level_ids(&result, 2), set(&["A"]));
}

#[test]
fn test_hit_records_edge_and_parent() {
    let graph = chain();
    let result = QueryEngine::new(&graph)
        .traverse("A", Direction::Outbound, 3)
        .unwrap();

    let hit = &result.level(2).unwrap().hits[0];
    assert_eq!(hit.from.id, "B");
    assert_eq!(hit.via.id, "B->C:DependsOn");
}

#[test]
fn test_depth_bound_reports_last_level() {
    let graph = chain();
    let engine = QueryEngine::new(&graph);

    let one = engine.traverse("A", Direction::Outbound, 1).unwrap();
    assert_eq!(one.total(), 1);
    assert_eq!(level_ids(&one, 1), set(&["B"]));

    assert!(engine.traverse("A", Direction::Outbound, 0).unwrap().is_empty());
}

#[test]
fn test_both_directions_and_shortest_hop() {
    // Diamond: A -> B -> D, A -> C -> D, plus D -> A back edge
    let graph = build(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "A")],
    );
    let engine = QueryEngine::new(&graph);

    let out = engine.traverse("A", Direction::Outbound, 5).unwrap();
    assert_eq!(out.total(), 3);
    assert_eq!(level_ids(&out, 1), set(&["B", "C"]));
    assert_eq!(level_ids(&out, 2), set(&["D"]));

    let both = engine.traverse("B", Direction::Both, 5).unwrap();
    assert_eq!(level_ids(&both, 1), set(&["A", "D"]));
    assert_eq!(level_ids(&both, 2), set(&["C"]));
}

#[test]
fn test_unknown_start_is_empty() {
    let graph = chain();
    let result = QueryEngine::new(&graph)
        .traverse("missing", Direction::Both, 3)
        .unwrap();

    assert!(result.start.is_none());
    assert!(result.is_empty());
}

#[test]
fn test_dangling_edges_are_skipped() {
    let mut graph = chain();
    helpers::add_dependency(&mut graph, "A", "ghost");
    graph.build_indexes();
    graph.populate_navigation().unwrap();

    let result = QueryEngine::new(&graph)
        .traverse("A", Direction::Outbound, 3)
        .unwrap();
    assert_eq!(result.total(), 2);
}

#[test]
fn test_depth_above_configured_limit() {
    let graph = chain();
    let engine = QueryEngine::with_config(&graph, EngineConfig::interactive());
    let limit = engine.config().max_traversal_depth;

    assert!(matches!(
        engine.traverse("A", Direction::Outbound, limit + 1),
        Err(GraphError::InvalidArgument { .. })
    ));
}

#[test]
fn test_centrality_of_hub() {
    let graph = build(
        &["hub", "l1", "l2", "l3", "l4", "l5"],
        &[("l1", "hub"), ("l2", "hub"), ("l3", "hub"), ("l4", "hub"), ("l5", "hub")],
    );
    let scores = QueryEngine::new(&graph).calculate_centrality();

    assert_eq!(scores.len(), 6);
    for score in scores {
        if score.node.id == "hub" {
            assert_eq!((score.in_degree, score.out_degree), (5, 0));
        } else {
            assert_eq!((score.in_degree, score.out_degree), (0, 1));
        }
        assert_eq!(score.total_degree(), score.in_degree + score.out_degree);
    }
}

#[test]
fn test_orphans() {
    let graph = build(&["A", "B", "C"], &[("A", "B")]);
    let orphans: BTreeSet<String> = QueryEngine::new(&graph)
        .find_orphans()
        .into_iter()
        .map(|n| n.id.clone())
        .collect();

    assert_eq!(orphans, set(&["A", "C"]));
}

#[test]
fn test_reloaded_sub_second_timeout_still_queries() {
    let graph = chain();
    let saved = EngineConfig::default().with_query_timeout(std::time::Duration::from_millis(500));
    let json = serde_json::to_string(&saved).unwrap();
    let config = EngineConfig::from_json_str(&json).unwrap();

    let engine = QueryEngine::with_config(&graph, config);
    assert_eq!(engine.traverse("A", Direction::Outbound, 3).unwrap().total(), 2);
    assert!(engine.find_cycles().unwrap().is_empty());
}
