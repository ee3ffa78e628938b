//! Rule evaluation over a built graph.

use super::query::{CompiledQuery, NodeQuery};
use crate::deadline::Deadline;
use crate::error::Result;
use crate::graph::{Edge, EdgeType, KnowledgeGraph, Node, Severity};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// A forbidden `(source, edge type, target)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureRule {
    /// Unique rule id; loaded rules override built-ins with the same id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Longer explanation
    #[serde(default)]
    pub description: String,
    /// Severity of every violation of this rule
    pub severity: Severity,
    /// Nodes the forbidden edge may not leave from
    pub source: NodeQuery,
    /// The edge type that is not allowed
    pub forbidden_edge: EdgeType,
    /// Nodes the forbidden edge may not point at
    pub target: NodeQuery,
}

impl ArchitectureRule {
    /// Create a rule; the name defaults to the id.
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        source: NodeQuery,
        forbidden_edge: EdgeType,
        target: NodeQuery,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            severity,
            source,
            forbidden_edge,
            target,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Compile both queries.
    pub fn compile(self) -> Result<CompiledRule> {
        let source = self.source.compile()?;
        let target = self.target.compile()?;
        Ok(CompiledRule {
            rule: self,
            source,
            target,
        })
    }
}

/// A rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: ArchitectureRule,
    source: CompiledQuery,
    target: CompiledQuery,
}

impl CompiledRule {
    /// The rule definition.
    pub fn rule(&self) -> &ArchitectureRule {
        &self.rule
    }

    /// Rule id.
    pub fn id(&self) -> &str {
        &self.rule.id
    }
}

/// One edge that breaks a rule. Built fresh on every evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RuleViolation<'a> {
    /// The broken rule
    pub rule: &'a ArchitectureRule,
    /// Node the offending edge leaves from
    pub source: &'a Node,
    /// Node the offending edge points at
    pub target: &'a Node,
    /// The offending edge
    pub edge: &'a Edge,
}

impl RuleViolation<'_> {
    /// Identity of the violation across graph versions: `ruleId|sourceId|targetId|edgeId`.
    pub fn signature(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.rule.id, self.source.id, self.target.id, self.edge.id
        )
    }

    /// Severity inherited from the rule.
    pub fn severity(&self) -> Severity {
        self.rule.severity
    }
}

/// Evaluates compiled rules against one graph.
pub struct RuleEngine<'g> {
    graph: &'g KnowledgeGraph,
    deadline: Deadline,
}

impl<'g> RuleEngine<'g> {
    /// Create an engine without a deadline.
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        if !graph.is_navigable() {
            warn!("Rule engine created over a graph without navigation; no edges will be seen");
        }
        Self {
            graph,
            deadline: Deadline::none(),
        }
    }

    /// Abort evaluation once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// All violations of one rule.
    ///
    /// Candidate sources come from the type index when the source query names a type.
    /// Dangling edges are skipped.
    pub fn evaluate_rule<'a>(&self, compiled: &'a CompiledRule) -> Result<Vec<RuleViolation<'a>>>
    where
        'g: 'a,
    {
        let graph = self.graph;
        let candidates: Box<dyn Iterator<Item = &'g Node> + 'g> = match compiled.source.node_type() {
            Some(node_type) => Box::new(graph.get_nodes_by_type(node_type)),
            None => Box::new(graph.nodes()),
        };

        let mut violations = Vec::new();
        for source in candidates {
            self.deadline.check("evaluate_rule")?;
            if !compiled.source.matches(source) {
                continue;
            }
            for edge in graph.outbound(source) {
                if edge.edge_type != compiled.rule.forbidden_edge {
                    continue;
                }
                let Some(target) = graph.target_of(edge) else {
                    continue;
                };
                if compiled.target.matches(target) {
                    trace!(
                        "Rule {} violated by {} -> {}",
                        compiled.rule.id,
                        source.id,
                        target.id
                    );
                    violations.push(RuleViolation {
                        rule: &compiled.rule,
                        source,
                        target,
                        edge,
                    });
                }
            }
        }

        debug!(
            "Rule {} produced {} violations",
            compiled.rule.id,
            violations.len()
        );
        Ok(violations)
    }

    /// Violations of every rule, in rule order.
    pub fn evaluate_rules<'a>(&self, rules: &'a [CompiledRule]) -> Result<Vec<RuleViolation<'a>>>
    where
        'g: 'a,
    {
        let mut violations = Vec::new();
        for rule in rules {
            violations.extend(self.evaluate_rule(rule)?);
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn controller_rule() -> CompiledRule {
        ArchitectureRule::new(
            "no-controller-to-repository",
            Severity::Error,
            NodeQuery::new().named("*Controller"),
            EdgeType::DependsOn,
            NodeQuery::new().named("*Repository"),
        )
        .compile()
        .unwrap()
    }

    fn graph(edge_type: EdgeType) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(Node::new("c", "OrderController", NodeType::Class));
        graph.add_node(Node::new("r", "OrderRepository", NodeType::Class));
        graph.add_edge(Edge::new("e1", "c", "r", edge_type));
        graph.add_edge(Edge::new("e2", "c", "missing", edge_type));
        graph.build_indexes();
        graph.populate_navigation().unwrap();
        graph
    }

    #[test]
    fn test_signature_format() {
        let graph = graph(EdgeType::DependsOn);
        let rule = controller_rule();
        let violations = RuleEngine::new(&graph).evaluate_rule(&rule).unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].signature(),
            "no-controller-to-repository|c|r|e1"
        );
        assert_eq!(violations[0].severity(), Severity::Error);
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let graph = graph(EdgeType::DependsOn);
        let rule = controller_rule();
        let engine = RuleEngine::new(&graph)
            .with_deadline(Deadline::after(std::time::Duration::ZERO));

        assert!(engine.evaluate_rule(&rule).is_err());
    }

    #[test]
    fn test_rule_decodes_camel_case() {
        let rule: ArchitectureRule = serde_json::from_str(
            r#"{
                "id": "x",
                "name": "X",
                "severity": "warning",
                "source": {"namePattern": "*Controller"},
                "forbiddenEdge": "DependsOn",
                "target": {"type": "Table"}
            }"#,
        )
        .unwrap();
        assert_eq!(rule.severity, Severity::Warning);
        assert_eq!(rule.forbidden_edge, EdgeType::DependsOn);
        assert_eq!(rule.target.node_type, Some(NodeType::Table));
        assert!(rule.description.is_empty());
    }
}
