//! Core graph types: nodes, edges and their enums.

use super::property::{keys, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

/// Position of a node or edge inside the graph arena.
pub(crate) type Slot = usize;

/// Type of a node in the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Solution or workspace root
    Solution,
    /// Project or build unit
    Project,
    /// Namespace or package
    Namespace,
    /// Class (also DTOs and unknown code types)
    Class,
    /// Interface or protocol
    Interface,
    /// Value type
    Struct,
    /// Record type
    Record,
    /// Enumeration
    Enum,
    /// Delegate or function type
    Delegate,
    /// Method or constructor
    Method,
    /// Property
    Property,
    /// Field
    Field,
    /// Event
    Event,
    /// Third-party package dependency
    ExternalPackage,
    /// SQL table
    Table,
    /// SQL stored procedure or function
    StoredProcedure,
    /// SQL view
    View,
    /// SQL column
    Column,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Type of edge (relationship) between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Parent contains child (namespace contains class, class contains method)
    Contains,
    /// Generic reference
    References,
    /// Type A depends on type B
    DependsOn,
    /// Class implements interface
    Implements,
    /// Class A inherits from class B
    Inherits,
    /// Method A calls method B
    Calls,
    /// Project uses an external package
    UsesPackage,
    /// Code calls a stored procedure
    CallsProc,
    /// Code type matched to a SQL object by name (exact, fuzzy or property match)
    NameMatch,
    /// Code type bound to a SQL object through an attribute
    AttributeBinding,
    /// SQL text traced from code to the objects it touches
    QueryTrace,
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Direction for traversal queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing edges (what this node uses)
    Outbound,
    /// Follow incoming edges (what uses this node)
    Inbound,
    /// Follow edges in both directions
    Both,
}

/// Severity of a rule violation or dependency cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Worth knowing about
    #[serde(alias = "info")]
    Info,
    /// Should be fixed
    #[serde(alias = "warning")]
    Warning,
    /// Must be fixed
    #[serde(alias = "error")]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A node in the knowledge graph.
///
/// Nodes represent structural elements: types, members, packages and SQL objects.
/// The inbound/outbound edge lists are filled by
/// [`KnowledgeGraph::populate_navigation`](super::KnowledgeGraph::populate_navigation)
/// and are only reachable through the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable, globally unique identifier (the source atom id)
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of structural element
    pub node_type: NodeType,
    /// Source file, when known
    pub file_path: Option<String>,
    /// Line in `file_path`, when known
    pub line_number: Option<u32>,
    /// Flexible key-value metadata
    pub properties: PropertyMap,
    #[serde(skip)]
    pub(crate) inbound: Vec<Slot>,
    #[serde(skip)]
    pub(crate) outbound: Vec<Slot>,
}

impl Node {
    /// Create a new node with no location and no properties.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            file_path: None,
            line_number: None,
            properties: PropertyMap::new(),
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }

    /// Builder pattern: set the source location.
    pub fn with_location(mut self, file_path: impl Into<String>, line_number: u32) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = Some(line_number);
        self
    }

    /// Builder pattern: add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Add or update a property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key, value);
    }

    /// Get a property value.
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Containing namespace, if recorded.
    pub fn namespace(&self) -> Option<&str> {
        self.properties.get_string(keys::NAMESPACE)
    }

    /// Public flag, if recorded.
    pub fn is_public(&self) -> Option<bool> {
        self.properties.get_bool(keys::IS_PUBLIC)
    }

    /// Originating repository tag, if recorded.
    pub fn repository(&self) -> Option<&str> {
        self.properties.get_string(keys::REPOSITORY)
    }

    /// Number of incoming edges (valid once navigation is populated).
    pub fn in_degree(&self) -> usize {
        self.inbound.len()
    }

    /// Number of outgoing edges (valid once navigation is populated).
    pub fn out_degree(&self) -> usize {
        self.outbound.len()
    }
}

/// A directed edge in the knowledge graph.
///
/// An edge may point at an id with no matching node. Such dangling edges are kept;
/// their resolved endpoint is simply absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Stable identifier (the source link id)
    pub id: String,
    /// Source node ID
    pub source_id: String,
    /// Target node ID
    pub target_id: String,
    /// Type of relationship
    pub edge_type: EdgeType,
    /// Metadata, at least `confidence` and optionally `evidence`
    pub properties: PropertyMap,
    #[serde(skip)]
    pub(crate) source: Option<Slot>,
    #[serde(skip)]
    pub(crate) target: Option<Slot>,
}

impl Edge {
    /// Create a new edge with full confidence.
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type,
            properties: PropertyMap::new().with(keys::CONFIDENCE, 1.0),
            source: None,
            target: None,
        }
    }

    /// Builder pattern: set the confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.properties
            .insert(keys::CONFIDENCE, confidence.clamp(0.0, 1.0));
        self
    }

    /// Builder pattern: attach evidence text.
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.properties.insert(keys::EVIDENCE, evidence.into());
        self
    }

    /// Add or update a property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key, value);
    }

    /// Get a property value.
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Confidence in [0, 1]; edges without one count as certain.
    pub fn confidence(&self) -> f64 {
        self.properties.get_float(keys::CONFIDENCE).unwrap_or(1.0)
    }

    /// Evidence text, if any.
    pub fn evidence(&self) -> Option<&str> {
        self.properties.get_string(keys::EVIDENCE)
    }

    /// Both endpoints resolved to nodes (valid once navigation is populated).
    pub fn is_resolved(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }
}
