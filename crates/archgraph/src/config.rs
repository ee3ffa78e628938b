//! Engine configuration.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default ceiling on traversal depth.
pub const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 64;

/// Configuration for query and rule evaluation behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Largest `max_depth` a traversal may request
    pub max_traversal_depth: usize,

    /// Deadline per query operation (None = no deadline), in seconds; fractions allowed
    #[serde(with = "duration_option")]
    pub query_timeout: Option<Duration>,

    /// External rule document merged over the built-in catalog
    pub rules_path: Option<PathBuf>,
}

// Helper module for serializing Duration as (fractional) seconds
mod duration_option {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(secs) = Option::<f64>::deserialize(deserializer)? else {
            return Ok(None);
        };
        // A zero deadline would fail every query immediately
        if secs <= 0.0 {
            return Err(D::Error::custom(format!(
                "queryTimeout must be positive, got {secs}"
            )));
        }
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(D::Error::custom)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: DEFAULT_MAX_TRAVERSAL_DEPTH,
            query_timeout: None,
            rules_path: None,
        }
    }
}

impl EngineConfig {
    /// Create config for interactive use (API resolvers): bounded depth and a short deadline
    pub fn interactive() -> Self {
        Self {
            max_traversal_depth: 16,
            query_timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        }
    }

    /// Create config for batch use (CI diffs): no deadline
    pub fn batch() -> Self {
        Self {
            max_traversal_depth: 256,
            query_timeout: None,
            ..Default::default()
        }
    }

    /// Set the traversal depth ceiling
    pub fn with_max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    /// Set the per-operation deadline
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the external rule document
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = Some(path.into());
        self
    }

    /// Decode a configuration from a JSON document.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Serialization`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::serialization("Failed to parse engine config", Some(e)))
    }

    /// Read and decode a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be read and
    /// [`GraphError::Serialization`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.max_traversal_depth, DEFAULT_MAX_TRAVERSAL_DEPTH);
        assert!(config.query_timeout.is_none());
        assert!(config.rules_path.is_none());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"queryTimeout": 5}"#).unwrap();

        assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_traversal_depth, DEFAULT_MAX_TRAVERSAL_DEPTH);
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let result = EngineConfig::from_json_str(r#"{"maxTraversalDepth": "deep"}"#);

        assert!(matches!(result, Err(GraphError::Serialization { .. })));
    }

    #[test]
    fn test_sub_second_timeout_round_trips() {
        let config = EngineConfig::default().with_query_timeout(Duration::from_millis(500));
        let json = serde_json::to_string(&config).unwrap();
        let reloaded = EngineConfig::from_json_str(&json).unwrap();

        assert_eq!(reloaded.query_timeout, Some(Duration::from_millis(500)));
        assert_eq!(reloaded, config);

        let config = EngineConfig::default().with_query_timeout(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            EngineConfig::from_json_str(&json).unwrap().query_timeout,
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_zero_or_negative_timeout_rejected() {
        for json in [r#"{"queryTimeout": 0}"#, r#"{"queryTimeout": -1.5}"#] {
            assert!(matches!(
                EngineConfig::from_json_str(json),
                Err(GraphError::Serialization { .. })
            ));
        }
    }

    #[test]
    fn test_null_timeout_is_none() {
        let config = EngineConfig::from_json_str(r#"{"queryTimeout": null}"#).unwrap();
        assert!(config.query_timeout.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::interactive()
            .with_max_traversal_depth(4)
            .with_rules_path("rules.json");

        assert_eq!(config.max_traversal_depth, 4);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.rules_path, Some(PathBuf::from("rules.json")));
    }
}
