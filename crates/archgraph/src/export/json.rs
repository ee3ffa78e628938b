//! JSON format export for D3.js and web visualization tools.
//!
//! Generates JSON with "nodes" and "links" arrays compatible with D3.js force-directed
//! layouts. Each node carries its layer; when a layout hint is given it is attached
//! under "layout". Dangling edges are left out since D3 cannot place them.

use crate::error::{GraphError, Result};
use crate::graph::{Edge, KnowledgeGraph, Node, PropertyMap};
use crate::pattern::{assign_layer, Layer, LayoutHint};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Export the graph as a pretty-printed D3.js document.
pub fn export_json(graph: &KnowledgeGraph, hint: Option<&LayoutHint>) -> Result<String> {
    serde_json::to_string_pretty(&export_json_value(graph, hint))
        .map_err(|e| GraphError::serialization("Failed to serialize graph export", Some(e)))
}

/// Export the graph as a JSON value.
///
/// Layers come from `hint` when it assigns the node one, else from the name heuristics.
pub fn export_json_value(graph: &KnowledgeGraph, hint: Option<&LayoutHint>) -> Value {
    let hinted: HashMap<&str, Layer> = hint
        .map(|hint| {
            hint.layers
                .iter()
                .map(|assignment| (assignment.node_id.as_str(), assignment.layer))
                .collect()
        })
        .unwrap_or_default();

    let nodes: Vec<Value> = graph
        .nodes()
        .map(|node| {
            let layer = hinted
                .get(node.id.as_str())
                .copied()
                .unwrap_or_else(|| assign_layer(node));
            node_to_json(node, layer)
        })
        .collect();

    let links: Vec<Value> = graph
        .edges()
        .filter(|edge| graph.source_of(edge).is_some() && graph.target_of(edge).is_some())
        .map(edge_to_json)
        .collect();

    let mut document = json!({
        "nodes": nodes,
        "links": links,
    });
    if let Some(hint) = hint {
        document["layout"] = json!(hint);
    }
    document
}

/// Convert node to JSON object
fn node_to_json(node: &Node, layer: Layer) -> Value {
    json!({
        "id": node.id,
        "name": node.name,
        "type": node.node_type.to_string(),
        "layer": layer,
        "filePath": node.file_path,
        "lineNumber": node.line_number,
        "properties": properties_to_json(&node.properties),
    })
}

fn edge_to_json(edge: &Edge) -> Value {
    json!({
        "id": edge.id,
        "source": edge.source_id,
        "target": edge.target_id,
        "type": edge.edge_type.to_string(),
        "properties": properties_to_json(&edge.properties),
    })
}

/// Convert PropertyMap to JSON object
fn properties_to_json(props: &PropertyMap) -> Value {
    serde_json::to_value(props).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{keys, EdgeType, NodeType};
    use crate::pattern::PatternDetector;

    fn graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(
            Node::new("c", "OrderController", NodeType::Class)
                .with_property(keys::NAMESPACE, "Shop.Web"),
        );
        graph.add_node(Node::new("r", "OrderRepository", NodeType::Class));
        graph.add_edge(Edge::new("e1", "c", "r", EdgeType::DependsOn));
        graph.add_edge(Edge::new("e2", "c", "ghost", EdgeType::DependsOn));
        graph.build_indexes();
        graph.populate_navigation().unwrap();
        graph
    }

    #[test]
    fn test_properties_to_json() {
        let props = PropertyMap::new().with("name", "test").with("count", 42i64);

        let json = properties_to_json(&props);
        assert!(json.is_object());
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
    }

    #[test]
    fn test_export_skips_dangling_links() {
        let value = export_json_value(&graph(), None);

        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["links"].as_array().unwrap().len(), 1);
        assert_eq!(value["nodes"][0]["layer"], "presentation");
        assert_eq!(value["nodes"][1]["layer"], "infrastructure");
        assert!(value.get("layout").is_none());
    }

    #[test]
    fn test_export_attaches_layout() {
        let graph = graph();
        let hint = PatternDetector::new().detect(&graph, None);
        let text = export_json(&graph, Some(&hint)).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["layout"]["pattern"], hint.pattern.as_str());
    }
}
