//! Node predicates used by architecture rules.

use crate::error::{GraphError, Result};
use crate::graph::{Node, NodeType};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Upper bound on compiled glob size; globs are user-supplied.
const GLOB_SIZE_LIMIT: usize = 1 << 20;

/// Predicate over nodes. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeQuery {
    /// Exact node type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    /// Glob over the node name (`*` and `?` wildcards, case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    /// Glob over the node namespace; a node without one is matched as ""
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_pattern: Option<String>,
    /// Required `is_public` value; a node without the property never matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl NodeQuery {
    /// Query that matches every node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one node type.
    pub fn of_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Restrict by name glob.
    pub fn named(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Restrict by namespace glob.
    pub fn in_namespace(mut self, pattern: impl Into<String>) -> Self {
        self.namespace_pattern = Some(pattern.into());
        self
    }

    /// Restrict by visibility.
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    /// Compile the globs. Fails on patterns that cannot be compiled.
    pub fn compile(&self) -> Result<CompiledQuery> {
        Ok(CompiledQuery {
            name: self.name_pattern.as_deref().map(glob_to_regex).transpose()?,
            namespace: self
                .namespace_pattern
                .as_deref()
                .map(glob_to_regex)
                .transpose()?,
            query: self.clone(),
        })
    }
}

/// A [`NodeQuery`] with its globs compiled.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    query: NodeQuery,
    name: Option<Regex>,
    namespace: Option<Regex>,
}

impl CompiledQuery {
    /// The query this was compiled from.
    pub fn query(&self) -> &NodeQuery {
        &self.query
    }

    /// Node type restriction, if any.
    pub fn node_type(&self) -> Option<NodeType> {
        self.query.node_type
    }

    /// Whether `node` satisfies every present predicate.
    pub fn matches(&self, node: &Node) -> bool {
        if self.query.node_type.is_some_and(|t| t != node.node_type) {
            return false;
        }
        if let Some(name) = &self.name {
            if !name.is_match(&node.name) {
                return false;
            }
        }
        if let Some(namespace) = &self.namespace {
            if !namespace.is_match(node.namespace().unwrap_or("")) {
                return false;
            }
        }
        match self.query.is_public {
            Some(wanted) => node.is_public() == Some(wanted),
            None => true,
        }
    }
}

/// Compile a glob into an anchored, case-insensitive regex.
///
/// `*` matches any run of characters, `?` exactly one; everything else is literal.
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(GLOB_SIZE_LIMIT)
        .build()
        .map_err(|source| GraphError::InvalidPattern {
            pattern: glob.to_string(),
            source,
        })
}
