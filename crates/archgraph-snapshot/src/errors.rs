use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a snapshot document
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Failed to read the snapshot file
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// The document is not a valid snapshot
    #[error("Invalid snapshot document: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
