//! Error types for archgraph operations.
//!
//! Lookups that find nothing are not errors: they return empty results. Errors are
//! reserved for malformed configuration, invalid call arguments and exceeded deadlines.

use archgraph_snapshot::SnapshotError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for archgraph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Comprehensive error type for all graph operations.
///
/// Errors are designed to fail fast and provide clear context about what went wrong.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Operation called in the wrong build phase (e.g. navigation before indexing)
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong
        message: String,
    },

    /// Invalid argument passed to a query
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: String,
        /// Why the value was rejected
        message: String,
    },

    /// A name or namespace glob could not be compiled
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The glob as written in the rule
        pattern: String,
        /// Underlying regex compile error
        #[source]
        source: regex::Error,
    },

    /// A rule definition is well-formed JSON but semantically invalid
    #[error("Invalid rule '{rule_id}': {message}")]
    RuleConfig {
        /// Id of the offending rule
        rule_id: String,
        /// What is wrong with it
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to read a configuration or rule document
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot document could not be loaded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A query ran past its deadline
    #[error("Deadline exceeded during {operation}")]
    DeadlineExceeded {
        /// Operation that was cut short
        operation: String,
    },
}

impl GraphError {
    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a rule configuration error.
    pub fn rule_config(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleConfig {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error tagged with the path being read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = GraphError::InvalidArgument {
            argument: "max_depth".to_string(),
            message: "must not exceed 64".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid argument 'max_depth': must not exceed 64"
        );
    }

    #[test]
    fn test_rule_config_error() {
        let err = GraphError::rule_config("layers", "needs at least two layers");
        assert_eq!(
            err.to_string(),
            "Invalid rule 'layers': needs at least two layers"
        );
    }

    #[test]
    fn test_serialization_error() {
        let err = GraphError::serialization("Failed to parse rules", None::<std::io::Error>);
        assert_eq!(err.to_string(), "Serialization error: Failed to parse rules");
    }

    #[test]
    fn test_deadline_exceeded_error() {
        let err = GraphError::DeadlineExceeded {
            operation: "find_cycles".to_string(),
        };
        assert_eq!(err.to_string(), "Deadline exceeded during find_cycles");
    }
}
