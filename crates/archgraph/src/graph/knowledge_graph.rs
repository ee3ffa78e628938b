//! The knowledge graph container: node/edge arena, indexes and navigation.

use super::types::{Edge, Node, NodeType, Slot};
use crate::error::{GraphError, Result};
use log::{debug, info, trace, warn};
use std::collections::HashMap;

/// An indexed, write-once graph of structural elements.
///
/// Construction happens in three explicit phases:
///
/// 1. [`add_node`](Self::add_node) / [`add_edge`](Self::add_edge) append to the arena
/// 2. [`build_indexes`](Self::build_indexes) rebuilds every lookup index from scratch
/// 3. [`populate_navigation`](Self::populate_navigation) resolves edge endpoints and
///    per-node inbound/outbound lists
///
/// After that the graph is read-only and can be shared freely (e.g. behind an `Arc`).
/// Navigation is stored as arena slots rather than references, so nodes and edges
/// never own each other.
///
/// Duplicate ids are last-writer-wins: adding a node or edge whose id is already
/// present replaces the earlier one in place and logs a warning.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    // By-id lookup, maintained on insert so duplicates can be replaced in place
    node_slots: HashMap<String, Slot>,
    edge_slots: HashMap<String, Slot>,
    // Derived indexes, rebuilt by build_indexes()
    by_type: HashMap<NodeType, Vec<Slot>>,
    by_namespace: HashMap<String, Vec<Slot>>,
    edges_by_source: HashMap<String, Vec<Slot>>,
    edges_by_target: HashMap<String, Vec<Slot>>,
    indexed: bool,
    navigable: bool,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the arena.
    ///
    /// Invalidates indexes and navigation until they are rebuilt.
    pub fn add_node(&mut self, mut node: Node) {
        node.inbound.clear();
        node.outbound.clear();
        self.indexed = false;
        self.navigable = false;

        if let Some(&slot) = self.node_slots.get(&node.id) {
            warn!("Duplicate node id {}, replacing earlier node", node.id);
            self.nodes[slot] = node;
            return;
        }

        trace!("Adding node: id={}, type={}", node.id, node.node_type);
        self.node_slots.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Add an edge to the arena.
    ///
    /// The endpoints do not have to exist; dangling edges are kept as-is.
    /// Invalidates indexes and navigation until they are rebuilt.
    pub fn add_edge(&mut self, mut edge: Edge) {
        edge.source = None;
        edge.target = None;
        self.indexed = false;
        self.navigable = false;

        if let Some(&slot) = self.edge_slots.get(&edge.id) {
            warn!("Duplicate edge id {}, replacing earlier edge", edge.id);
            self.edges[slot] = edge;
            return;
        }

        trace!(
            "Adding edge: id={}, {} -[{}]-> {}",
            edge.id,
            edge.source_id,
            edge.edge_type,
            edge.target_id
        );
        self.edge_slots.insert(edge.id.clone(), self.edges.len());
        self.edges.push(edge);
    }

    /// Rebuild every lookup index from the arena in one O(N+E) pass.
    ///
    /// Idempotent: calling it again without further additions yields identical indexes.
    pub fn build_indexes(&mut self) {
        self.node_slots.clear();
        self.edge_slots.clear();
        self.by_type.clear();
        self.by_namespace.clear();
        self.edges_by_source.clear();
        self.edges_by_target.clear();

        for (slot, node) in self.nodes.iter().enumerate() {
            self.node_slots.insert(node.id.clone(), slot);
            self.by_type.entry(node.node_type).or_default().push(slot);
            if let Some(namespace) = node.namespace() {
                self.by_namespace
                    .entry(namespace.to_string())
                    .or_default()
                    .push(slot);
            }
        }

        for (slot, edge) in self.edges.iter().enumerate() {
            self.edge_slots.insert(edge.id.clone(), slot);
            self.edges_by_source
                .entry(edge.source_id.clone())
                .or_default()
                .push(slot);
            self.edges_by_target
                .entry(edge.target_id.clone())
                .or_default()
                .push(slot);
        }

        self.indexed = true;
        debug!(
            "Indexed graph: {} nodes, {} edges, {} namespaces",
            self.nodes.len(),
            self.edges.len(),
            self.by_namespace.len()
        );
    }

    /// Resolve edge endpoints and per-node inbound/outbound edge lists.
    ///
    /// Must run after [`build_indexes`](Self::build_indexes). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidOperation`] if the indexes are stale.
    pub fn populate_navigation(&mut self) -> Result<()> {
        if !self.indexed {
            return Err(GraphError::InvalidOperation {
                message: "populate_navigation requires build_indexes after the last mutation"
                    .to_string(),
            });
        }

        for node in &mut self.nodes {
            node.outbound = self
                .edges_by_source
                .get(&node.id)
                .cloned()
                .unwrap_or_default();
            node.inbound = self
                .edges_by_target
                .get(&node.id)
                .cloned()
                .unwrap_or_default();
        }

        let mut dangling = 0usize;
        for edge in &mut self.edges {
            edge.source = self.node_slots.get(&edge.source_id).copied();
            edge.target = self.node_slots.get(&edge.target_id).copied();
            if !edge.is_resolved() {
                dangling += 1;
            }
        }

        self.navigable = true;
        info!(
            "Graph ready: {} nodes, {} edges ({} dangling)",
            self.nodes.len(),
            self.edges.len(),
            dangling
        );
        Ok(())
    }

    /// Whether the indexes reflect the last mutation.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Whether node/edge navigation reflects the last mutation.
    pub fn is_navigable(&self) -> bool {
        self.navigable
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Look up a node by id.
    pub fn get_node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_slots.get(id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Look up an edge by id.
    pub fn get_edge_by_id(&self, id: &str) -> Option<&Edge> {
        self.edge_slots.get(id).and_then(|&slot| self.edges.get(slot))
    }

    /// All nodes of the given type (empty if none).
    pub fn get_nodes_by_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.node_slots_to_nodes(self.by_type.get(&node_type))
    }

    /// All nodes whose `namespace` property equals `namespace` exactly (empty if none).
    pub fn get_nodes_by_namespace(&self, namespace: &str) -> impl Iterator<Item = &Node> {
        self.node_slots_to_nodes(self.by_namespace.get(namespace))
    }

    /// All edges whose `source_id` is `node_id`, including dangling ones.
    pub fn get_edges_by_source(&self, node_id: &str) -> impl Iterator<Item = &Edge> {
        self.edge_slots_to_edges(self.edges_by_source.get(node_id).map(Vec::as_slice))
    }

    /// All edges whose `target_id` is `node_id`, including dangling ones.
    pub fn get_edges_by_target(&self, node_id: &str) -> impl Iterator<Item = &Edge> {
        self.edge_slots_to_edges(self.edges_by_target.get(node_id).map(Vec::as_slice))
    }

    /// Edges pointing at `node` (requires populated navigation).
    pub fn inbound<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edge_slots_to_edges(Some(node.inbound.as_slice()))
    }

    /// Edges leaving `node` (requires populated navigation).
    pub fn outbound<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edge_slots_to_edges(Some(node.outbound.as_slice()))
    }

    /// Resolved source node of `edge`, `None` if dangling.
    pub fn source_of(&self, edge: &Edge) -> Option<&Node> {
        edge.source.and_then(|slot| self.nodes.get(slot))
    }

    /// Resolved target node of `edge`, `None` if dangling.
    pub fn target_of(&self, edge: &Edge) -> Option<&Node> {
        edge.target.and_then(|slot| self.nodes.get(slot))
    }

    fn node_slots_to_nodes<'a>(
        &'a self,
        slots: Option<&'a Vec<Slot>>,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        slots
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&slot| self.nodes.get(slot))
    }

    fn edge_slots_to_edges<'a>(
        &'a self,
        slots: Option<&'a [Slot]>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        slots
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&slot| self.edges.get(slot))
    }
}
