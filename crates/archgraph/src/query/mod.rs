//! Read-only queries over a built [`KnowledgeGraph`].
//!
//! [`QueryEngine`] bundles a graph with an [`EngineConfig`] and applies the
//! configured depth ceiling and per-query deadline to every operation.
//!
//! ```rust
//! use archgraph::{helpers, Direction, EngineConfig, KnowledgeGraph, QueryEngine};
//!
//! let mut graph = KnowledgeGraph::new();
//! helpers::add_type(&mut graph, "A", "OrderService", "Shop.App");
//! helpers::add_type(&mut graph, "B", "OrderRepository", "Shop.Data");
//! helpers::add_dependency(&mut graph, "A", "B");
//! graph.build_indexes();
//! graph.populate_navigation().unwrap();
//!
//! let engine = QueryEngine::with_config(&graph, EngineConfig::default());
//! let impact = engine.blast_radius("B").unwrap();
//! assert_eq!(impact.nodes.len(), 1);
//! assert!(!impact.truncated);
//! ```

mod cycles;
mod metrics;
mod traversal;

pub use cycles::{classify_severity, find_cycles, GraphCycle};
pub use metrics::{calculate_centrality, find_orphans, CentralityScore};
pub use traversal::{traverse, TraversalHit, TraversalLevel, TraversalResult};

use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::error::{GraphError, Result};
use crate::graph::{Direction, KnowledgeGraph, Node};
use crate::pattern::{LayoutHint, PatternDetector};
use crate::rules::{CompiledRule, RuleEngine, RuleViolation};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;

/// Nodes affected by a change to one node.
#[derive(Debug, Clone, Serialize)]
pub struct BlastRadius<'g> {
    /// Every node reached over inbound edges, nearest first
    pub nodes: Vec<&'g Node>,
    /// The depth ceiling stopped the walk before the closure was complete
    pub truncated: bool,
}

/// Query façade over one immutable graph.
pub struct QueryEngine<'g> {
    graph: &'g KnowledgeGraph,
    config: EngineConfig,
}

impl<'g> QueryEngine<'g> {
    /// Create an engine with the default configuration.
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(graph: &'g KnowledgeGraph, config: EngineConfig) -> Self {
        if !graph.is_navigable() {
            warn!("Query engine created over a graph without navigation; queries will see no edges");
        }
        Self { graph, config }
    }

    /// The graph being queried.
    pub fn graph(&self) -> &'g KnowledgeGraph {
        self.graph
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn deadline(&self) -> Deadline {
        Deadline::from_timeout(self.config.query_timeout)
    }

    /// Breadth-first traversal from `start_id`, grouped by depth.
    ///
    /// `max_depth` above the configured ceiling is rejected. A depth of zero or an
    /// unknown start id yields an empty result.
    pub fn traverse(
        &self,
        start_id: &str,
        direction: Direction,
        max_depth: usize,
    ) -> Result<TraversalResult<'g>> {
        if max_depth > self.config.max_traversal_depth {
            return Err(GraphError::InvalidArgument {
                argument: "max_depth".to_string(),
                message: format!(
                    "{max_depth} exceeds the configured limit of {}",
                    self.config.max_traversal_depth
                ),
            });
        }
        traverse(self.graph, start_id, direction, max_depth, self.deadline())
    }

    /// Every node that transitively depends on `node_id` (inbound closure).
    ///
    /// The walk stops at `max_traversal_depth` hops. When nodes at that depth still
    /// have unvisited dependents, the result is marked `truncated`; raise the
    /// ceiling (e.g. [`EngineConfig::batch`]) to get the full closure.
    pub fn blast_radius(&self, node_id: &str) -> Result<BlastRadius<'g>> {
        let max_depth = self.config.max_traversal_depth;
        let result = self.traverse(node_id, Direction::Inbound, max_depth)?;

        let mut reached: HashSet<&str> = result.nodes().map(|node| node.id.as_str()).collect();
        reached.insert(node_id);
        let truncated = result.level(max_depth).is_some_and(|frontier| {
            frontier.hits.iter().any(|hit| {
                self.graph
                    .inbound(hit.node)
                    .filter_map(|edge| self.graph.source_of(edge))
                    .any(|source| !reached.contains(source.id.as_str()))
            })
        });
        if truncated {
            debug!("Blast radius of {node_id} truncated at depth {max_depth}");
        }

        Ok(BlastRadius {
            nodes: result.nodes().collect(),
            truncated,
        })
    }

    /// Dependency cycles over outbound edges, with severities.
    pub fn find_cycles(&self) -> Result<Vec<GraphCycle<'g>>> {
        find_cycles(self.graph, self.deadline())
    }

    /// In/out degree of every node.
    pub fn calculate_centrality(&self) -> Vec<CentralityScore<'g>> {
        calculate_centrality(self.graph)
    }

    /// Nodes nothing points at.
    pub fn find_orphans(&self) -> Vec<&'g Node> {
        find_orphans(self.graph)
    }

    /// Topology of the whole graph, or of one namespace plus the edges touching it.
    pub fn detect_topology(&self, scope_namespace: Option<&str>) -> LayoutHint {
        PatternDetector::new().detect(self.graph, scope_namespace)
    }

    /// Violations of every rule, in rule order.
    pub fn evaluate_rules<'a>(&self, rules: &'a [CompiledRule]) -> Result<Vec<RuleViolation<'a>>>
    where
        'g: 'a,
    {
        RuleEngine::new(self.graph)
            .with_deadline(self.deadline())
            .evaluate_rules(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeType, NodeType};

    fn chain() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        for id in ["A", "B", "C"] {
            graph.add_node(Node::new(id, id, NodeType::Class));
        }
        graph.add_edge(Edge::new("ab", "A", "B", EdgeType::DependsOn));
        graph.add_edge(Edge::new("bc", "B", "C", EdgeType::DependsOn));
        graph.build_indexes();
        graph.populate_navigation().unwrap();
        graph
    }

    #[test]
    fn test_depth_above_ceiling_rejected() {
        let graph = chain();
        let engine =
            QueryEngine::with_config(&graph, EngineConfig::default().with_max_traversal_depth(4));

        assert!(engine.traverse("A", Direction::Outbound, 4).is_ok());
        assert!(matches!(
            engine.traverse("A", Direction::Outbound, 5),
            Err(GraphError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_blast_radius_is_inbound_closure() {
        let graph = chain();
        let engine = QueryEngine::new(&graph);

        let radius = engine.blast_radius("C").unwrap();
        let mut ids: Vec<&str> = radius.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();

        assert_eq!(ids, vec!["A", "B"]);
        assert!(!radius.truncated);
        assert!(engine.blast_radius("A").unwrap().nodes.is_empty());
    }

    #[test]
    fn test_blast_radius_reports_depth_cutoff() {
        let graph = chain();

        let shallow =
            QueryEngine::with_config(&graph, EngineConfig::default().with_max_traversal_depth(1));
        let radius = shallow.blast_radius("C").unwrap();
        assert_eq!(radius.nodes.len(), 1);
        assert_eq!(radius.nodes[0].id, "B");
        assert!(radius.truncated);

        // Reaching the ceiling exactly with nothing left beyond is not a cutoff
        let exact =
            QueryEngine::with_config(&graph, EngineConfig::default().with_max_traversal_depth(2));
        let radius = exact.blast_radius("C").unwrap();
        assert_eq!(radius.nodes.len(), 2);
        assert!(!radius.truncated);
    }
}
