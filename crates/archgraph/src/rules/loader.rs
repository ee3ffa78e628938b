//! Rule documents: decoding, expansion and merging over the built-in catalog.
//!
//! A rule document is a JSON array of definitions, each tagged by `type`:
//!
//! ```json
//! [
//!   {"type": "forbidden", "id": "no-ui-to-sql", "name": "No UI to SQL", "severity": "Error",
//!    "source": {"namespacePattern": "*.Web*"}, "forbiddenEdge": "CallsProc", "target": {}},
//!   {"type": "layering", "id": "clean", "severity": "Warning",
//!    "layers": [{"name": "web", "namespacePattern": "*.Web*"},
//!               {"name": "core", "namespacePattern": "*.Core*"}]},
//!   {"type": "visibility", "id": "no-internals", "severity": "Info",
//!    "source": {"namespacePattern": "Shop.Web*"}, "target": {"namespacePattern": "Shop.Core*"}}
//! ]
//! ```
//!
//! Every definition expands to plain [`ArchitectureRule`]s and every glob is compiled
//! at load time, so a bad document fails before any evaluation runs.

use super::catalog::builtin_rules;
use super::engine::{ArchitectureRule, CompiledRule};
use super::query::NodeQuery;
use crate::config::EngineConfig;
use crate::error::{GraphError, Result};
use crate::graph::{EdgeType, Severity};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One layer of a [`LayeringRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    /// Layer name used in generated rule ids
    pub name: String,
    /// Namespace glob selecting the layer's nodes
    pub namespace_pattern: String,
}

/// Lower layers must not reach upper layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeringRule {
    /// Definition id, prefix of the generated rule ids
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Longer explanation
    #[serde(default)]
    pub description: String,
    /// Severity of every generated rule
    pub severity: Severity,
    /// Layers, top first
    pub layers: Vec<LayerSpec>,
    /// Edge types that may not point upwards
    #[serde(default = "default_layering_edges")]
    pub edge_types: Vec<EdgeType>,
}

fn default_layering_edges() -> Vec<EdgeType> {
    vec![EdgeType::DependsOn]
}

/// Source nodes must not reach non-public target nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    /// Rule id
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Longer explanation
    #[serde(default)]
    pub description: String,
    /// Severity of violations
    pub severity: Severity,
    /// Nodes that may not reach into non-public code
    pub source: NodeQuery,
    /// Nodes whose non-public members are off-limits
    pub target: NodeQuery,
    /// Edge type that counts as reaching in
    #[serde(default = "default_visibility_edge")]
    pub forbidden_edge: EdgeType,
}

fn default_visibility_edge() -> EdgeType {
    EdgeType::References
}

/// A rule as written in a rule document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleDefinition {
    /// A single forbidden `(source, edge, target)` triple
    Forbidden(ArchitectureRule),
    /// Ordered layers, expanded to one triple per (lower, upper, edge type)
    Layering(LayeringRule),
    /// Forbidden edges into non-public targets
    Visibility(VisibilityRule),
}

impl RuleDefinition {
    /// Definition id, used as the merge key.
    pub fn id(&self) -> &str {
        match self {
            RuleDefinition::Forbidden(rule) => &rule.id,
            RuleDefinition::Layering(rule) => &rule.id,
            RuleDefinition::Visibility(rule) => &rule.id,
        }
    }

    /// Expand into plain rules.
    pub fn expand(self) -> Result<Vec<ArchitectureRule>> {
        if self.id().trim().is_empty() {
            return Err(GraphError::rule_config("", "rule id must not be empty"));
        }
        match self {
            RuleDefinition::Forbidden(rule) => Ok(vec![rule]),
            RuleDefinition::Layering(rule) => expand_layering(rule),
            RuleDefinition::Visibility(rule) => expand_visibility(rule).map(|rule| vec![rule]),
        }
    }
}

fn display_name(name: String, id: &str) -> String {
    if name.is_empty() {
        id.to_string()
    } else {
        name
    }
}

fn expand_layering(rule: LayeringRule) -> Result<Vec<ArchitectureRule>> {
    if rule.layers.len() < 2 {
        return Err(GraphError::rule_config(
            &rule.id,
            "layering needs at least two layers",
        ));
    }
    if rule.edge_types.is_empty() {
        return Err(GraphError::rule_config(
            &rule.id,
            "layering needs at least one edge type",
        ));
    }

    let name = display_name(rule.name, &rule.id);
    let mut expanded = Vec::new();
    for (upper_index, upper) in rule.layers.iter().enumerate() {
        for lower in &rule.layers[upper_index + 1..] {
            for &edge_type in &rule.edge_types {
                expanded.push(
                    ArchitectureRule::new(
                        format!("{}:{}->{}:{}", rule.id, lower.name, upper.name, edge_type),
                        rule.severity,
                        NodeQuery::new().in_namespace(lower.namespace_pattern.clone()),
                        edge_type,
                        NodeQuery::new().in_namespace(upper.namespace_pattern.clone()),
                    )
                    .with_name(format!("{name}: {} must not reach {}", lower.name, upper.name))
                    .with_description(rule.description.clone()),
                );
            }
        }
    }
    Ok(expanded)
}

fn expand_visibility(rule: VisibilityRule) -> Result<ArchitectureRule> {
    if rule.target.is_public == Some(true) {
        return Err(GraphError::rule_config(
            &rule.id,
            "visibility target cannot require public nodes",
        ));
    }
    let name = display_name(rule.name, &rule.id);
    Ok(ArchitectureRule::new(
        rule.id,
        rule.severity,
        rule.source,
        rule.forbidden_edge,
        rule.target.public(false),
    )
    .with_name(name)
    .with_description(rule.description))
}

/// Ordered rule catalog keyed by definition id.
///
/// Overriding a definition keeps its position; new definitions are appended.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<(String, Vec<ArchitectureRule>)>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        for rule in builtin_rules() {
            set.insert(rule.id.clone(), vec![rule]);
        }
        set
    }

    fn insert(&mut self, id: String, rules: Vec<ArchitectureRule>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => {
                debug!("Rule definition '{id}' overridden");
                entry.1 = rules;
            }
            None => self.entries.push((id, rules)),
        }
    }

    /// Expand and merge definitions; later definitions win on equal ids.
    pub fn merge(&mut self, definitions: Vec<RuleDefinition>) -> Result<()> {
        for definition in definitions {
            let id = definition.id().to_string();
            let rules = definition.expand()?;
            self.insert(id, rules);
        }
        Ok(())
    }

    /// Number of expanded rules.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, rules)| rules.len()).sum()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expanded rules in catalog order.
    pub fn rules(&self) -> impl Iterator<Item = &ArchitectureRule> {
        self.entries.iter().flat_map(|(_, rules)| rules.iter())
    }

    /// Expanded rule by id.
    pub fn get(&self, id: &str) -> Option<&ArchitectureRule> {
        self.rules().find(|rule| rule.id == id)
    }

    /// Compile every rule, failing on the first bad glob.
    pub fn compile(&self) -> Result<Vec<CompiledRule>> {
        self.rules().cloned().map(ArchitectureRule::compile).collect()
    }
}

/// Loads rule documents and merges them over the built-in catalog.
pub struct RuleLoader;

impl RuleLoader {
    /// Decode a rule document.
    pub fn parse(json: &str) -> Result<Vec<RuleDefinition>> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::serialization("Failed to parse rule document", Some(e)))
    }

    /// Built-in catalog merged with the definitions in `json`, compiled.
    pub fn from_json_str(json: &str) -> Result<Vec<CompiledRule>> {
        let mut set = RuleSet::builtin();
        set.merge(Self::parse(json)?)?;
        let compiled = set.compile()?;
        info!("Loaded rule document: {} rules active", compiled.len());
        Ok(compiled)
    }

    /// Built-in catalog merged with the rule document at `path`, compiled.
    pub fn load_file(path: &Path) -> Result<Vec<CompiledRule>> {
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        info!("Loading rules from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Rules for `config`: the built-in catalog, plus its `rules_path` document if set.
    pub fn from_config(config: &EngineConfig) -> Result<Vec<CompiledRule>> {
        match &config.rules_path {
            Some(path) => Self::load_file(path),
            None => RuleSet::builtin().compile(),
        }
    }
}
