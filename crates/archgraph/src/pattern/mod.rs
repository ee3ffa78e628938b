//! Topology pattern detection for layout hints.
//!
//! Four independent classifiers score the (optionally namespace-scoped) graph:
//!
//! | Pattern        | Signal                                                    |
//! |----------------|-----------------------------------------------------------|
//! | `disconnected` | edge/node ratio below 0.3                                 |
//! | `hub-spoke`    | one node touches at least 40% of all edges                |
//! | `pipeline`     | a path from a source covers 60% of nodes, low branching   |
//! | `layered`      | at least 40% of nodes fall into a known layer             |
//!
//! The best score above 0.3 wins; otherwise the graph is labelled `mesh`. Layer
//! assignments are returned either way.

mod layers;

pub use layers::{assign_layer, Layer};

use crate::graph::{KnowledgeGraph, Node};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Minimum confidence a classifier must beat to be reported.
const MIN_CONFIDENCE: f64 = 0.3;
/// Confidence reported for the `mesh` fallback.
const MESH_CONFIDENCE: f64 = 0.5;
const DISCONNECTED_RATIO: f64 = 0.3;
const HUB_SHARE: f64 = 0.4;
const HUB_SCALE: f64 = 1.2;
const PIPELINE_COVERAGE: f64 = 0.6;
const PIPELINE_MAX_BRANCH: f64 = 1.5;
const LAYERED_SHARE: f64 = 0.4;

/// Dominant shape of a (sub)graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyPattern {
    /// One node that most edges touch
    HubSpoke,
    /// A long chain with little branching
    Pipeline,
    /// Most nodes fall into architectural layers
    Layered,
    /// Few edges relative to nodes
    Disconnected,
    /// None of the above
    Mesh,
}

impl TopologyPattern {
    /// Kebab-case pattern name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyPattern::HubSpoke => "hub-spoke",
            TopologyPattern::Pipeline => "pipeline",
            TopologyPattern::Layered => "layered",
            TopologyPattern::Disconnected => "disconnected",
            TopologyPattern::Mesh => "mesh",
        }
    }
}

impl std::fmt::Display for TopologyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer chosen for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerAssignment {
    /// Node id
    pub node_id: String,
    /// Assigned layer
    pub layer: Layer,
}

/// Layout guidance for a visualization client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHint {
    /// Winning topology label
    pub pattern: TopologyPattern,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Hub node, for `hub-spoke`
    pub hub_node_id: Option<String>,
    /// Node ids along the chain, for `pipeline`
    pub pipeline_order: Option<Vec<String>>,
    /// One entry per node in scope, whatever the pattern
    pub layers: Vec<LayerAssignment>,
}

/// A classifier's verdict before the winner is picked.
struct Candidate {
    pattern: TopologyPattern,
    confidence: f64,
    hub_node_id: Option<String>,
    pipeline_order: Option<Vec<String>>,
}

impl Candidate {
    fn new(pattern: TopologyPattern, confidence: f64) -> Self {
        Self {
            pattern,
            confidence,
            hub_node_id: None,
            pipeline_order: None,
        }
    }
}

/// The node and edge set a detection runs over.
struct Scope<'g> {
    nodes: Vec<&'g Node>,
    ids: HashSet<&'g str>,
    /// (source, target) of every resolved edge touching the scope
    edges: Vec<(&'g str, &'g str)>,
}

impl<'g> Scope<'g> {
    fn new(graph: &'g KnowledgeGraph, namespace: Option<&str>) -> Self {
        let nodes: Vec<&Node> = match namespace {
            Some(ns) => graph.get_nodes_by_namespace(ns).collect(),
            None => graph.nodes().collect(),
        };
        let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        // Dangling edges carry no structure and are left out of every ratio
        let edges = graph
            .edges()
            .filter_map(|edge| Some((graph.source_of(edge)?, graph.target_of(edge)?)))
            .filter(|(source, target)| {
                ids.contains(source.id.as_str()) || ids.contains(target.id.as_str())
            })
            .map(|(source, target)| (source.id.as_str(), target.id.as_str()))
            .collect();
        Self { nodes, ids, edges }
    }

    fn node_count(&self) -> f64 {
        self.nodes.len() as f64
    }

    fn edge_count(&self) -> f64 {
        self.edges.len() as f64
    }
}

/// Classifies the dominant topology of a graph or namespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternDetector;

impl PatternDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Detect the topology of the whole graph, or of the nodes in `scope_namespace`
    /// plus every edge touching them. Dangling edges are ignored.
    pub fn detect(&self, graph: &KnowledgeGraph, scope_namespace: Option<&str>) -> LayoutHint {
        let scope = Scope::new(graph, scope_namespace);
        let layers: Vec<LayerAssignment> = scope
            .nodes
            .iter()
            .map(|node| LayerAssignment {
                node_id: node.id.clone(),
                layer: assign_layer(node),
            })
            .collect();

        if scope.nodes.is_empty() {
            return LayoutHint {
                pattern: TopologyPattern::Mesh,
                confidence: 0.0,
                hub_node_id: None,
                pipeline_order: None,
                layers,
            };
        }

        let candidates = [
            detect_disconnected(&scope),
            detect_hub_spoke(&scope),
            detect_pipeline(&scope),
            detect_layered(&scope, &layers),
        ];

        let winner = select_winner(candidates.into_iter().flatten());
        debug!(
            "Detected topology {} ({:.3}) over {} nodes",
            winner.pattern,
            winner.confidence,
            scope.nodes.len()
        );

        LayoutHint {
            pattern: winner.pattern,
            confidence: winner.confidence,
            hub_node_id: winner.hub_node_id,
            pipeline_order: winner.pipeline_order,
            layers,
        }
    }
}

/// Highest confidence strictly above [`MIN_CONFIDENCE`]; earlier candidates win ties.
/// Falls back to `mesh`.
fn select_winner(candidates: impl IntoIterator<Item = Candidate>) -> Candidate {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        debug!(
            "Topology candidate {}: {:.3}",
            candidate.pattern, candidate.confidence
        );
        let beats = best
            .as_ref()
            .map_or(true, |current| candidate.confidence > current.confidence);
        if candidate.confidence > MIN_CONFIDENCE && beats {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| Candidate::new(TopologyPattern::Mesh, MESH_CONFIDENCE))
}

fn detect_disconnected(scope: &Scope) -> Option<Candidate> {
    if scope.edges.is_empty() {
        return Some(Candidate::new(TopologyPattern::Disconnected, 1.0));
    }
    let ratio = scope.edge_count() / scope.node_count();
    (ratio < DISCONNECTED_RATIO).then(|| Candidate::new(TopologyPattern::Disconnected, 1.0 - ratio))
}

fn detect_hub_spoke(scope: &Scope) -> Option<Candidate> {
    if scope.edges.is_empty() {
        return None;
    }

    let mut degree: HashMap<&str, usize> = HashMap::new();
    for &(source, target) in &scope.edges {
        for end in [source, target] {
            if scope.ids.contains(end) {
                *degree.entry(end).or_default() += 1;
            }
        }
    }

    // First node in scope order wins ties
    let mut hub: Option<(&str, usize)> = None;
    for node in &scope.nodes {
        let d = degree.get(node.id.as_str()).copied().unwrap_or(0);
        if hub.map_or(true, |(_, best)| d > best) {
            hub = Some((node.id.as_str(), d));
        }
    }

    let (hub_id, hub_degree) = hub?;
    let ratio = hub_degree as f64 / scope.edge_count();
    (ratio >= HUB_SHARE).then(|| Candidate {
        hub_node_id: Some(hub_id.to_string()),
        ..Candidate::new(TopologyPattern::HubSpoke, (HUB_SCALE * ratio).min(1.0))
    })
}

fn detect_pipeline(scope: &Scope) -> Option<Candidate> {
    if scope.nodes.len() < 2 || scope.edges.is_empty() {
        return None;
    }

    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for &(source, target) in &scope.edges {
        if scope.ids.contains(source) && scope.ids.contains(target) {
            successors.entry(source).or_default().push(target);
            *in_degree.entry(target).or_default() += 1;
        }
    }

    let mut longest: Vec<&str> = Vec::new();
    for node in &scope.nodes {
        let id = node.id.as_str();
        if in_degree.contains_key(id) {
            continue;
        }
        let path = farthest_path(id, &successors);
        if path.len() > longest.len() {
            longest = path;
        }
    }

    let coverage = longest.len() as f64 / scope.node_count();
    let branch = scope.edge_count() / (scope.node_count() - 1.0);
    if coverage < PIPELINE_COVERAGE || branch > PIPELINE_MAX_BRANCH {
        return None;
    }

    let confidence =
        0.7 * coverage + 0.3 * (1.0 - branch.min(PIPELINE_MAX_BRANCH) / PIPELINE_MAX_BRANCH);
    Some(Candidate {
        pipeline_order: Some(longest.into_iter().map(str::to_string).collect()),
        ..Candidate::new(TopologyPattern::Pipeline, confidence)
    })
}

/// BFS from `start`; returns the path to the deepest node reached.
fn farthest_path<'a>(start: &'a str, successors: &HashMap<&'a str, Vec<&'a str>>) -> Vec<&'a str> {
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0usize)]);
    let (mut deepest, mut deepest_depth) = (start, 0usize);

    while let Some((current, depth)) = queue.pop_front() {
        if depth > deepest_depth {
            deepest = current;
            deepest_depth = depth;
        }
        for &next in successors.get(current).map(Vec::as_slice).unwrap_or(&[]) {
            if visited.insert(next) {
                parent.insert(next, current);
                queue.push_back((next, depth + 1));
            }
        }
    }

    let mut path = vec![deepest];
    let mut cursor = deepest;
    while let Some(&previous) = parent.get(cursor) {
        path.push(previous);
        cursor = previous;
    }
    path.reverse();
    path
}

fn detect_layered(scope: &Scope, layers: &[LayerAssignment]) -> Option<Candidate> {
    let matched = layers
        .iter()
        .filter(|assignment| assignment.layer != Layer::Unknown)
        .count();
    let ratio = matched as f64 / scope.node_count();
    (ratio >= LAYERED_SHARE).then(|| Candidate::new(TopologyPattern::Layered, ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeType, NodeType};

    fn graph_with(nodes: &[&str], edges: &[(&str, &str)]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        for id in nodes {
            graph.add_node(Node::new(*id, *id, NodeType::Class));
        }
        for (i, (s, t)) in edges.iter().enumerate() {
            graph.add_edge(Edge::new(format!("e{i}"), *s, *t, EdgeType::DependsOn));
        }
        graph.build_indexes();
        graph.populate_navigation().unwrap();
        graph
    }

    #[test]
    fn test_farthest_path_follows_chain() {
        let successors: HashMap<&str, Vec<&str>> =
            HashMap::from([("a", vec!["b"]), ("b", vec!["c"])]);

        assert_eq!(farthest_path("a", &successors), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_scope_is_zero_confidence_mesh() {
        let graph = graph_with(&["A"], &[]);
        let hint = PatternDetector::new().detect(&graph, Some("Nowhere"));

        assert_eq!(hint.pattern, TopologyPattern::Mesh);
        assert_eq!(hint.confidence, 0.0);
        assert!(hint.layers.is_empty());
    }

    #[test]
    fn test_dense_graph_falls_back_to_mesh() {
        // Complete digraph on 6 nodes: no hub, no pipeline, no layers
        let ids = ["A", "B", "C", "D", "E", "F"];
        let mut edges = Vec::new();
        for s in ids {
            for t in ids {
                if s != t {
                    edges.push((s, t));
                }
            }
        }
        let graph = graph_with(&ids, &edges);
        let hint = PatternDetector::new().detect(&graph, None);

        assert_eq!(hint.pattern, TopologyPattern::Mesh);
        assert_eq!(hint.confidence, MESH_CONFIDENCE);
        assert_eq!(hint.layers.len(), 6);
    }

    #[test]
    fn test_threshold_is_strict() {
        let at_threshold = select_winner([Candidate::new(TopologyPattern::Layered, MIN_CONFIDENCE)]);
        assert_eq!(at_threshold.pattern, TopologyPattern::Mesh);
        assert_eq!(at_threshold.confidence, MESH_CONFIDENCE);

        let above = select_winner([Candidate::new(TopologyPattern::Layered, 0.31)]);
        assert_eq!(above.pattern, TopologyPattern::Layered);
    }

    #[test]
    fn test_ties_go_to_earlier_classifier() {
        let winner = select_winner([
            Candidate::new(TopologyPattern::Disconnected, 0.9),
            Candidate::new(TopologyPattern::HubSpoke, 0.9),
        ]);
        assert_eq!(winner.pattern, TopologyPattern::Disconnected);

        let winner = select_winner([
            Candidate::new(TopologyPattern::Disconnected, 0.8),
            Candidate::new(TopologyPattern::HubSpoke, 1.0),
        ]);
        assert_eq!(winner.pattern, TopologyPattern::HubSpoke);
    }

    #[test]
    fn test_pattern_names() {
        assert_eq!(TopologyPattern::HubSpoke.to_string(), "hub-spoke");
        assert_eq!(
            serde_json::to_value(TopologyPattern::Disconnected).unwrap(),
            serde_json::json!("disconnected")
        );
    }
}
