//! Heuristic architectural layer assignment.

use crate::graph::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// Architectural layer a node most likely belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Controllers, views, API endpoints
    Presentation,
    /// Services, handlers, use cases
    Application,
    /// Entities, aggregates, domain models
    Domain,
    /// Repositories, persistence, data access
    Infrastructure,
    /// Third-party packages, gateways, clients
    External,
    /// Nothing matched
    Unknown,
}

impl Layer {
    /// Lowercase layer name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Presentation => "presentation",
            Layer::Application => "application",
            Layer::Domain => "domain",
            Layer::Infrastructure => "infrastructure",
            Layer::External => "external",
            Layer::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase substrings that mark a layer, checked in table order.
const LAYER_MARKERS: &[(Layer, &[&str])] = &[
    (
        Layer::Presentation,
        &["presentation", "controller", ".web", ".ui", ".api", "view", "page", "endpoint"],
    ),
    (
        Layer::Application,
        &["application", "service", "handler", "usecase", "command"],
    ),
    (
        Layer::Domain,
        &["domain", "entity", "entities", "model", "aggregate", "valueobject"],
    ),
    (
        Layer::Infrastructure,
        &["infrastructure", "repository", "persistence", ".data", "dbcontext", "migration"],
    ),
    (
        Layer::External,
        &["external", "thirdparty", "vendor", "gateway", "client"],
    ),
];

fn match_markers(text: &str) -> Option<Layer> {
    if text.is_empty() {
        return None;
    }
    let text = text.to_lowercase();
    LAYER_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| text.contains(marker)))
        .map(|(layer, _)| *layer)
}

/// Assign a layer from the node's namespace, falling back to its name.
///
/// External packages are always [`Layer::External`].
pub fn assign_layer(node: &Node) -> Layer {
    if node.node_type == NodeType::ExternalPackage {
        return Layer::External;
    }
    node.namespace()
        .and_then(match_markers)
        .or_else(|| match_markers(&node.name))
        .unwrap_or(Layer::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::keys;

    fn class(name: &str, namespace: Option<&str>) -> Node {
        let node = Node::new(name, name, NodeType::Class);
        match namespace {
            Some(ns) => node.with_property(keys::NAMESPACE, ns),
            None => node,
        }
    }

    #[test]
    fn test_namespace_wins_over_name() {
        // Name says repository, namespace says domain
        let node = class("OrderRepository", Some("Shop.Domain.Orders"));
        assert_eq!(assign_layer(&node), Layer::Domain);
    }

    #[test]
    fn test_name_fallback() {
        assert_eq!(assign_layer(&class("OrderController", None)), Layer::Presentation);
        assert_eq!(assign_layer(&class("OrderRepository", Some("Shop"))), Layer::Infrastructure);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(assign_layer(&class("X", Some("SHOP.APPLICATION"))), Layer::Application);
    }

    #[test]
    fn test_unknown_and_external() {
        assert_eq!(assign_layer(&class("Widget", Some("Shop"))), Layer::Unknown);
        let package = Node::new("pkg", "Newtonsoft.Json", NodeType::ExternalPackage);
        assert_eq!(assign_layer(&package), Layer::External);
    }
}
