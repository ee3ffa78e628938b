use crate::{
    atoms::{CodeAtom, SqlAtom},
    errors::{SnapshotError, SnapshotResult},
    links::Link,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scan output for a single repository
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub code_atoms: Vec<CodeAtom>,

    #[serde(default)]
    pub sql_atoms: Vec<SqlAtom>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl Snapshot {
    /// Create a new empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a snapshot from a JSON document
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }

    /// Read and decode a snapshot file
    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SnapshotError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json)
    }

    /// Total number of atoms (code and SQL)
    pub fn atom_count(&self) -> usize {
        self.code_atoms.len() + self.sql_atoms.len()
    }

    /// Total number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn add_code_atom(&mut self, atom: CodeAtom) {
        self.code_atoms.push(atom);
    }

    pub fn add_sql_atom(&mut self, atom: SqlAtom) {
        self.sql_atoms.push(atom);
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }
}

/// One member of a federation: a repository name and its scan output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Repository tag stamped on every node and edge built from this snapshot
    pub repository: String,

    pub snapshot: Snapshot,
}

impl RepositorySnapshot {
    pub fn new(repository: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            repository: repository.into(),
            snapshot,
        }
    }
}

/// Scan output for several repositories, merged by the federation engine
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedSnapshot {
    #[serde(default)]
    pub repositories: Vec<RepositorySnapshot>,

    /// Links whose endpoints live in different repositories
    #[serde(default)]
    pub cross_links: Vec<Link>,
}

impl FederatedSnapshot {
    /// Create a new empty federation
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a federated snapshot from a JSON document
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }

    /// Read and decode a federated snapshot file
    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SnapshotError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json)
    }

    pub fn add_repository(&mut self, repository: impl Into<String>, snapshot: Snapshot) {
        self.repositories
            .push(RepositorySnapshot::new(repository, snapshot));
    }

    pub fn add_cross_link(&mut self, link: Link) {
        self.cross_links.push(link);
    }

    /// Total number of atoms across all repositories
    pub fn atom_count(&self) -> usize {
        self.repositories
            .iter()
            .map(|r| r.snapshot.atom_count())
            .sum()
    }

    /// Total number of links, including cross-repository links
    pub fn link_count(&self) -> usize {
        self.repositories
            .iter()
            .map(|r| r.snapshot.link_count())
            .sum::<usize>()
            + self.cross_links.len()
    }
}
