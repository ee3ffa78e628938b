//! Core graph types and the indexed container.
//!
//! This module defines the fundamental building blocks:
//! - [`Node`]: Structural elements (types, members, SQL objects)
//! - [`Edge`]: Directed, typed relationships between node ids
//! - [`KnowledgeGraph`]: The indexed, write-once container

mod knowledge_graph;
mod property;
mod types;

pub use knowledge_graph::KnowledgeGraph;
pub use property::{keys, PropertyMap, PropertyValue};
pub(crate) use types::Slot;
pub use types::{Direction, Edge, EdgeType, Node, NodeType, Severity};
