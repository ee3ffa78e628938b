//! Structural diff between two graph versions.
//!
//! A diff has three independent parts: node/edge id set differences, rule violations
//! that are new in the current graph, and cycles that are new in the current graph.
//! Violations and cycles that persist across both versions are not reported.

use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::graph::KnowledgeGraph;
use crate::query::{find_cycles, GraphCycle};
use crate::rules::{CompiledRule, RuleEngine, RuleViolation};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;

/// Node and edge ids present in only one of the two graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDiff {
    /// In current, not in baseline (current insertion order)
    pub added_nodes: Vec<String>,
    /// In baseline, not in current (baseline insertion order)
    pub removed_nodes: Vec<String>,
    /// In current, not in baseline
    pub added_edges: Vec<String>,
    /// In baseline, not in current
    pub removed_edges: Vec<String>,
}

impl GraphDiff {
    /// Whether both graphs have the same node and edge ids.
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

/// Result of [`DiffEngine::compare`]. Borrows from the current graph and the rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralDiff<'a> {
    /// Id-level topology changes
    pub diff: GraphDiff,
    /// Violations in current whose signature is absent from baseline
    pub new_violations: Vec<RuleViolation<'a>>,
    /// Cycles in current whose signature is absent from baseline
    pub new_cycles: Vec<GraphCycle<'a>>,
}

impl StructuralDiff<'_> {
    /// Whether current introduced any violation or cycle.
    pub fn has_regressions(&self) -> bool {
        !self.new_violations.is_empty() || !self.new_cycles.is_empty()
    }
}

/// Compares two graphs without mutating either.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    config: EngineConfig,
}

impl DiffEngine {
    /// Diff engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff engine whose rule and cycle passes honor `config.query_timeout`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    fn deadline(&self) -> Deadline {
        Deadline::from_timeout(self.config.query_timeout)
    }

    /// Compare `baseline` to `current` under `rules`.
    pub fn compare<'a>(
        &self,
        baseline: &KnowledgeGraph,
        current: &'a KnowledgeGraph,
        rules: &'a [CompiledRule],
    ) -> Result<StructuralDiff<'a>> {
        let diff = topology_diff(baseline, current);

        let baseline_violations: HashSet<String> = RuleEngine::new(baseline)
            .with_deadline(self.deadline())
            .evaluate_rules(rules)?
            .iter()
            .map(RuleViolation::signature)
            .collect();
        let new_violations: Vec<RuleViolation<'a>> = RuleEngine::new(current)
            .with_deadline(self.deadline())
            .evaluate_rules(rules)?
            .into_iter()
            .filter(|violation| !baseline_violations.contains(&violation.signature()))
            .collect();

        let baseline_cycles: HashSet<String> = find_cycles(baseline, self.deadline())?
            .iter()
            .map(GraphCycle::signature)
            .collect();
        let new_cycles: Vec<GraphCycle<'a>> = find_cycles(current, self.deadline())?
            .into_iter()
            .filter(|cycle| !baseline_cycles.contains(&cycle.signature()))
            .collect();

        info!(
            "Diff: +{}/-{} nodes, +{}/-{} edges, {} new violations, {} new cycles",
            diff.added_nodes.len(),
            diff.removed_nodes.len(),
            diff.added_edges.len(),
            diff.removed_edges.len(),
            new_violations.len(),
            new_cycles.len()
        );

        Ok(StructuralDiff {
            diff,
            new_violations,
            new_cycles,
        })
    }
}

/// Set difference of node ids and edge ids.
pub fn topology_diff(baseline: &KnowledgeGraph, current: &KnowledgeGraph) -> GraphDiff {
    let baseline_nodes: HashSet<&str> = baseline.nodes().map(|n| n.id.as_str()).collect();
    let current_nodes: HashSet<&str> = current.nodes().map(|n| n.id.as_str()).collect();
    let baseline_edges: HashSet<&str> = baseline.edges().map(|e| e.id.as_str()).collect();
    let current_edges: HashSet<&str> = current.edges().map(|e| e.id.as_str()).collect();

    let diff = GraphDiff {
        added_nodes: current
            .nodes()
            .filter(|n| !baseline_nodes.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect(),
        removed_nodes: baseline
            .nodes()
            .filter(|n| !current_nodes.contains(n.id.as_str()))
            .map(|n| n.id.clone())
            .collect(),
        added_edges: current
            .edges()
            .filter(|e| !baseline_edges.contains(e.id.as_str()))
            .map(|e| e.id.clone())
            .collect(),
        removed_edges: baseline
            .edges()
            .filter(|e| !current_edges.contains(e.id.as_str()))
            .map(|e| e.id.clone())
            .collect(),
    };
    debug!("Topology diff empty: {}", diff.is_empty());
    diff
}
