use serde::{Deserialize, Serialize};

/// Kind of relationship reported by a scanner or the semantic linker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Contains,
    References,
    DependsOn,
    Implements,
    Inherits,
    Calls,
    UsesPackage,
    CallsProc,
    /// Code type name equals a SQL object name
    ExactMatch,
    /// Code type name is close to a SQL object name
    FuzzyMatch,
    /// Code property name matches a column name
    PropertyMatch,
    /// Mapping declared through an attribute (e.g. `[Table("Orders")]`)
    AttributeBinding,
    /// SQL text traced from a code member to the objects it touches
    QueryTrace,
    #[serde(other)]
    Other,
}

/// Represents a directed relationship between two atoms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Stable identifier, reused as the graph edge id
    pub id: String,

    pub source_id: String,

    pub target_id: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,

    /// How sure the producer is about this link, in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Free-form justification (matched text, attribute source, ...)
    #[serde(default)]
    pub evidence: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        link_type: LinkType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            link_type,
            confidence: default_confidence(),
            evidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}
