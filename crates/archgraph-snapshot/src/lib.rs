//! archgraph Snapshot
//!
//! The inbound data contract for the archgraph knowledge graph.
//!
//! Language scanners, the semantic linker and the federation engine all hand their
//! results to the graph builder through the types defined here:
//!
//! - **Atoms**: one scanned structural fact each ([`CodeAtom`], [`SqlAtom`])
//! - **Links**: directed relationships between atoms ([`Link`])
//! - **Snapshots**: a single repository ([`Snapshot`]) or several merged ones
//!   ([`FederatedSnapshot`])
//!
//! Everything is plain data and decodes from JSON, so producers can live in any
//! process or language.
//!
//! # Example
//!
//! ```rust
//! use archgraph_snapshot::{CodeAtom, CodeAtomType, Link, LinkType, Snapshot};
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.add_code_atom(
//!     CodeAtom::new("T:Shop.OrderController", "OrderController", CodeAtomType::Class)
//!         .with_namespace("Shop.Web"),
//! );
//! snapshot.add_code_atom(
//!     CodeAtom::new("T:Shop.OrderRepository", "OrderRepository", CodeAtomType::Class)
//!         .with_namespace("Shop.Data"),
//! );
//! snapshot.add_link(Link::new(
//!     "L1",
//!     "T:Shop.OrderController",
//!     "T:Shop.OrderRepository",
//!     LinkType::DependsOn,
//! ));
//!
//! assert_eq!(snapshot.atom_count(), 2);
//! assert_eq!(snapshot.link_count(), 1);
//! ```

pub mod atoms;
pub mod errors;
pub mod links;
pub mod snapshot;

pub use atoms::{CodeAtom, CodeAtomType, SqlAtom, SqlAtomType};
pub use errors::{SnapshotError, SnapshotResult};
pub use links::{Link, LinkType};
pub use snapshot::{FederatedSnapshot, RepositorySnapshot, Snapshot};
