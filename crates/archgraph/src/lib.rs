//! # archgraph
//!
//! An in-memory knowledge graph of a codebase's structure, built for impact analysis,
//! architecture rule enforcement, layout hints and structural diffs.
//!
//! ## Core Principles
//!
//! - **Scanner Agnostic**: Scanners produce [`archgraph_snapshot`] documents, we build the graph
//! - **Write Once**: Build, index, navigate, then share read-only
//! - **Rules Are Data**: Every architecture rule is a `(source, edge, target)` triple
//! - **Empty Over Error**: Unknown ids and dangling edges degrade to empty results
//!
//! ## Architecture
//!
//! ```text
//! Snapshot / FederatedSnapshot
//!     ↓
//! GraphBuilder
//!     ↓
//! KnowledgeGraph (arena, indexes, navigation)
//!     ↓
//! QueryEngine · RuleEngine · PatternDetector · DiffEngine
//! ```
//!
//! ## Example
//!
//! ```rust
//! use archgraph::{helpers, Direction, KnowledgeGraph, QueryEngine, RuleLoader};
//!
//! let mut graph = KnowledgeGraph::new();
//! helpers::add_type(&mut graph, "ctl", "OrderController", "Shop.Web");
//! helpers::add_type(&mut graph, "repo", "OrderRepository", "Shop.Data");
//! helpers::add_dependency(&mut graph, "ctl", "repo");
//! graph.build_indexes();
//! graph.populate_navigation().unwrap();
//!
//! let engine = QueryEngine::new(&graph);
//! let reached = engine.traverse("ctl", Direction::Outbound, 3).unwrap();
//! assert_eq!(reached.total(), 1);
//!
//! let rules = RuleLoader::from_json_str("[]").unwrap();
//! let violations = engine.evaluate_rules(&rules).unwrap();
//! assert_eq!(violations.len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod builder;
pub mod config;
pub mod deadline;
pub mod diff;
pub mod error;
pub mod export;
pub mod graph;
pub mod handle;
pub mod helpers;
pub mod pattern;
pub mod query;
pub mod rules;

// Re-export main types
pub use builder::GraphBuilder;
pub use config::EngineConfig;
pub use deadline::Deadline;
pub use diff::{DiffEngine, GraphDiff, StructuralDiff};
pub use error::{GraphError, Result};
pub use graph::{
    Direction, Edge, EdgeType, KnowledgeGraph, Node, NodeType, PropertyMap, PropertyValue,
    Severity,
};
pub use handle::GraphHandle;
pub use pattern::{LayerAssignment, LayoutHint, PatternDetector, TopologyPattern};
pub use query::{BlastRadius, CentralityScore, GraphCycle, QueryEngine, TraversalResult};
pub use rules::{
    ArchitectureRule, CompiledRule, NodeQuery, RuleDefinition, RuleEngine, RuleLoader, RuleSet,
    RuleViolation,
};
