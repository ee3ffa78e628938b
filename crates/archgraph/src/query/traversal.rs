//! Depth-bounded breadth-first traversal.

use crate::deadline::Deadline;
use crate::error::Result;
use crate::graph::{Direction, Edge, KnowledgeGraph, Node};
use log::debug;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// One node reached during a traversal.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalHit<'g> {
    /// The node reached
    pub node: &'g Node,
    /// Edge followed to reach it
    pub via: &'g Edge,
    /// Node it was reached from
    pub from: &'g Node,
}

/// All nodes first discovered at the same hop distance.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalLevel<'g> {
    /// Hop distance from the start node (1-based)
    pub depth: usize,
    /// Nodes discovered at this depth; order within a level is unspecified
    pub hits: Vec<TraversalHit<'g>>,
}

/// Result of [`traverse`]: hits grouped into depth-ordered levels.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalResult<'g> {
    /// The start node, `None` if the id was unknown
    pub start: Option<&'g Node>,
    /// Direction that was followed
    pub direction: Direction,
    /// Levels in strictly increasing depth
    pub levels: Vec<TraversalLevel<'g>>,
}

impl<'g> TraversalResult<'g> {
    fn empty(start: Option<&'g Node>, direction: Direction) -> Self {
        Self {
            start,
            direction,
            levels: Vec::new(),
        }
    }

    /// Total number of nodes reached (excluding the start node).
    pub fn total(&self) -> usize {
        self.levels.iter().map(|level| level.hits.len()).sum()
    }

    /// Whether nothing was reached.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The level at hop distance `depth`, if any node was found there.
    pub fn level(&self, depth: usize) -> Option<&TraversalLevel<'g>> {
        self.levels.iter().find(|level| level.depth == depth)
    }

    /// Every node reached, level by level.
    pub fn nodes(&self) -> impl Iterator<Item = &'g Node> + '_ {
        self.levels
            .iter()
            .flat_map(|level| level.hits.iter().map(|hit| hit.node))
    }
}

/// Breadth-first traversal from `start_id` following `direction`.
///
/// A single visited set is seeded with the start node, so every node is reported
/// once, at the depth where it was first discovered. Nodes are expanded only while
/// their depth is below `max_depth`. Dangling edges are skipped. An unknown start id
/// yields an empty result.
pub fn traverse<'g>(
    graph: &'g KnowledgeGraph,
    start_id: &str,
    direction: Direction,
    max_depth: usize,
    deadline: Deadline,
) -> Result<TraversalResult<'g>> {
    let Some(start) = graph.get_node_by_id(start_id) else {
        debug!("Traverse from unknown node {start_id}");
        return Ok(TraversalResult::empty(None, direction));
    };

    let mut result = TraversalResult::empty(Some(start), direction);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start.id.as_str());
    queue.push_back((start, 0usize)); // (node, depth)

    while let Some((current, depth)) = queue.pop_front() {
        deadline.check("traverse")?;

        if depth >= max_depth {
            continue;
        }

        for (edge, neighbor) in neighbors(graph, current, direction) {
            if !visited.insert(neighbor.id.as_str()) {
                continue;
            }

            if result.levels.len() <= depth {
                result.levels.push(TraversalLevel {
                    depth: depth + 1,
                    hits: Vec::new(),
                });
            }
            result.levels[depth].hits.push(TraversalHit {
                node: neighbor,
                via: edge,
                from: current,
            });
            queue.push_back((neighbor, depth + 1));
        }
    }

    debug!(
        "Traverse from {start_id} ({direction:?}, depth {max_depth}): {} nodes in {} levels",
        result.total(),
        result.levels.len()
    );
    Ok(result)
}

/// Resolved neighbors of `node` with the edge leading to each; dangling edges are skipped.
pub(crate) fn neighbors<'g>(
    graph: &'g KnowledgeGraph,
    node: &'g Node,
    direction: Direction,
) -> Vec<(&'g Edge, &'g Node)> {
    let outbound = || {
        graph
            .outbound(node)
            .filter_map(|edge| graph.target_of(edge).map(|target| (edge, target)))
    };
    let inbound = || {
        graph
            .inbound(node)
            .filter_map(|edge| graph.source_of(edge).map(|source| (edge, source)))
    };

    match direction {
        Direction::Outbound => outbound().collect(),
        Direction::Inbound => inbound().collect(),
        Direction::Both => outbound().chain(inbound()).collect(),
    }
}
