//! Graph construction from scan snapshots.
//!
//! Every atom becomes exactly one [`Node`] and every link exactly one [`Edge`],
//! keeping the atom/link id so ids stay stable across rebuilds. Types outside the
//! mapping tables fall back to the nearest generic bucket instead of failing.

use crate::error::Result;
use crate::graph::{keys, Edge, EdgeType, KnowledgeGraph, Node, NodeType};
use archgraph_snapshot::{
    CodeAtom, CodeAtomType, FederatedSnapshot, Link, LinkType, Snapshot, SqlAtom, SqlAtomType,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Map a scanned code element kind to a node type.
pub fn map_code_type(atom_type: CodeAtomType) -> NodeType {
    match atom_type {
        CodeAtomType::Solution => NodeType::Solution,
        CodeAtomType::Project => NodeType::Project,
        CodeAtomType::Namespace => NodeType::Namespace,
        CodeAtomType::Class | CodeAtomType::Dto => NodeType::Class,
        CodeAtomType::Interface => NodeType::Interface,
        CodeAtomType::Struct => NodeType::Struct,
        CodeAtomType::Record => NodeType::Record,
        CodeAtomType::Enum => NodeType::Enum,
        CodeAtomType::Delegate => NodeType::Delegate,
        CodeAtomType::Method | CodeAtomType::Constructor => NodeType::Method,
        CodeAtomType::Property => NodeType::Property,
        CodeAtomType::Field => NodeType::Field,
        CodeAtomType::Event => NodeType::Event,
        CodeAtomType::ExternalPackage => NodeType::ExternalPackage,
        CodeAtomType::Other => NodeType::Class,
    }
}

/// Map a scanned SQL object kind to a node type.
pub fn map_sql_type(atom_type: SqlAtomType) -> NodeType {
    match atom_type {
        SqlAtomType::Table | SqlAtomType::Other => NodeType::Table,
        SqlAtomType::View => NodeType::View,
        SqlAtomType::StoredProcedure | SqlAtomType::Function => NodeType::StoredProcedure,
        SqlAtomType::Column => NodeType::Column,
    }
}

/// Map a link kind to an edge type.
///
/// All name-matching flavours collapse into [`EdgeType::NameMatch`].
pub fn map_link_type(link_type: LinkType) -> EdgeType {
    match link_type {
        LinkType::Contains => EdgeType::Contains,
        LinkType::References => EdgeType::References,
        LinkType::DependsOn | LinkType::Other => EdgeType::DependsOn,
        LinkType::Implements => EdgeType::Implements,
        LinkType::Inherits => EdgeType::Inherits,
        LinkType::Calls => EdgeType::Calls,
        LinkType::UsesPackage => EdgeType::UsesPackage,
        LinkType::CallsProc => EdgeType::CallsProc,
        LinkType::ExactMatch | LinkType::FuzzyMatch | LinkType::PropertyMatch => {
            EdgeType::NameMatch
        }
        LinkType::AttributeBinding => EdgeType::AttributeBinding,
        LinkType::QueryTrace => EdgeType::QueryTrace,
    }
}

/// Builds a navigable [`KnowledgeGraph`] from scan output.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Build a graph from a single-repository snapshot.
    ///
    /// The returned graph is indexed and navigable.
    pub fn build(&self, snapshot: &Snapshot) -> Result<KnowledgeGraph> {
        let mut graph = KnowledgeGraph::new();
        add_snapshot(&mut graph, snapshot, None);
        finish(graph)
    }

    /// Build a graph from a federated snapshot.
    ///
    /// Every node and edge is stamped with its originating repository. Cross-repository
    /// links take the repository of their source atom when it is known.
    pub fn build_federated(&self, federated: &FederatedSnapshot) -> Result<KnowledgeGraph> {
        let mut graph = KnowledgeGraph::new();
        let mut atom_repository: HashMap<&str, &str> = HashMap::new();

        for member in &federated.repositories {
            debug!(
                "Adding repository {}: {} atoms, {} links",
                member.repository,
                member.snapshot.atom_count(),
                member.snapshot.link_count()
            );
            add_snapshot(&mut graph, &member.snapshot, Some(&member.repository));

            let code_ids = member.snapshot.code_atoms.iter().map(|a| a.id.as_str());
            let sql_ids = member.snapshot.sql_atoms.iter().map(|a| a.id.as_str());
            for id in code_ids.chain(sql_ids) {
                atom_repository.insert(id, member.repository.as_str());
            }
        }

        for link in &federated.cross_links {
            let repository = atom_repository.get(link.source_id.as_str()).copied();
            graph.add_edge(link_to_edge(link, repository));
        }

        finish(graph)
    }

    /// Read a snapshot document and build a graph from it.
    pub fn load(&self, path: &Path) -> Result<KnowledgeGraph> {
        info!("Loading snapshot from {:?}", path);
        let snapshot = Snapshot::load(path)?;
        self.build(&snapshot)
    }

    /// Read a federated snapshot document and build one graph from all its repositories.
    pub fn load_federated(&self, path: &Path) -> Result<KnowledgeGraph> {
        info!("Loading federated snapshot from {:?}", path);
        let federated = FederatedSnapshot::load(path)?;
        self.build_federated(&federated)
    }
}

fn add_snapshot(graph: &mut KnowledgeGraph, snapshot: &Snapshot, repository: Option<&str>) {
    for atom in &snapshot.code_atoms {
        graph.add_node(code_atom_to_node(atom, repository));
    }
    for atom in &snapshot.sql_atoms {
        graph.add_node(sql_atom_to_node(atom, repository));
    }
    for link in &snapshot.links {
        graph.add_edge(link_to_edge(link, repository));
    }
}

fn finish(mut graph: KnowledgeGraph) -> Result<KnowledgeGraph> {
    graph.build_indexes();
    graph.populate_navigation()?;
    info!(
        "Built knowledge graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn code_atom_to_node(atom: &CodeAtom, repository: Option<&str>) -> Node {
    let mut node = Node::new(&atom.id, &atom.name, map_code_type(atom.atom_type))
        .with_property(keys::IS_PUBLIC, atom.is_public);
    node.file_path = atom.file_path.clone();
    node.line_number = atom.line_number;

    if !atom.namespace.is_empty() {
        node.set_property(keys::NAMESPACE, atom.namespace.as_str());
    }
    if let Some(signature) = &atom.signature {
        node.set_property(keys::SIGNATURE, signature.as_str());
    }
    if let Some(lines) = atom.lines_of_code {
        node.set_property(keys::LINES_OF_CODE, lines);
    }
    if let Some(language) = &atom.language {
        node.set_property(keys::LANGUAGE, language.as_str());
    }
    if let Some(repository) = repository {
        node.set_property(keys::REPOSITORY, repository);
    }
    node
}

fn sql_atom_to_node(atom: &SqlAtom, repository: Option<&str>) -> Node {
    let mut node = Node::new(&atom.id, &atom.name, map_sql_type(atom.atom_type))
        .with_property(keys::IS_NULLABLE, atom.is_nullable);

    if let Some(parent) = &atom.parent_table {
        node.set_property(keys::PARENT_TABLE, parent.as_str());
    }
    if let Some(data_type) = &atom.data_type {
        node.set_property(keys::DATA_TYPE, data_type.as_str());
    }
    if let Some(repository) = repository {
        node.set_property(keys::REPOSITORY, repository);
    }
    node
}

fn link_to_edge(link: &Link, repository: Option<&str>) -> Edge {
    let edge_type = map_link_type(link.link_type);
    let mut edge = Edge::new(&link.id, &link.source_id, &link.target_id, edge_type)
        .with_confidence(link.confidence);

    if let Some(evidence) = &link.evidence {
        edge.set_property(keys::EVIDENCE, evidence.as_str());
    }
    if edge_type == EdgeType::NameMatch {
        edge.set_property(keys::LINK_KIND, format!("{:?}", link.link_type));
    }
    if let Some(repository) = repository {
        edge.set_property(keys::REPOSITORY, repository);
    }
    edge
}
