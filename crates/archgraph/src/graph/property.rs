//! Property system for node and edge metadata.
//!
//! A small tagged union instead of an untyped object bag: every value is a string,
//! integer, float, boolean or list of strings, and typed getters return `None` on a
//! kind mismatch instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known property keys written by the graph builder.
pub mod keys {
    /// Containing namespace (string)
    pub const NAMESPACE: &str = "namespace";
    /// Member signature (string)
    pub const SIGNATURE: &str = "signature";
    /// Public flag (bool)
    pub const IS_PUBLIC: &str = "is_public";
    /// Originating repository tag (string)
    pub const REPOSITORY: &str = "repository";
    /// Line count of the element (int)
    pub const LINES_OF_CODE: &str = "lines_of_code";
    /// Source language (string)
    pub const LANGUAGE: &str = "language";
    /// Owning table of a column (string)
    pub const PARENT_TABLE: &str = "parent_table";
    /// SQL data type of a column (string)
    pub const DATA_TYPE: &str = "data_type";
    /// Column nullability (bool)
    pub const IS_NULLABLE: &str = "is_nullable";
    /// Edge confidence in [0, 1] (float)
    pub const CONFIDENCE: &str = "confidence";
    /// Edge evidence text (string)
    pub const EVIDENCE: &str = "evidence";
    /// Original link kind when several collapse into one edge type (string)
    pub const LINK_KIND: &str = "link_kind";
}

/// Strongly-typed property value for node/edge metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// String value (namespaces, signatures, tags)
    String(String),
    /// Integer value (line counts)
    Int(i64),
    /// Floating point value (confidence scores)
    Float(f64),
    /// Boolean flag (is_public, is_nullable)
    Bool(bool),
    /// List of strings (attributes, tags)
    StringList(Vec<String>),
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::StringList(value)
    }
}

/// Flexible key-value metadata store for nodes and edges.
///
/// Provides builder pattern and type-safe getters for properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap {
    data: HashMap<String, PropertyValue>,
}

impl PropertyMap {
    /// Create a new empty property map.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builder pattern: add a property and return self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Insert a property value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Get a property value by key.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.data.get(key)
    }

    /// Check if a property exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the number of properties.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the property map is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all properties.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.data.iter()
    }

    /// Type-safe getter for string properties.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Type-safe getter for integer properties.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key) {
            Some(PropertyValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Type-safe getter for numeric properties; integers widen to float.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.data.get(key) {
            Some(PropertyValue::Float(f)) => Some(*f),
            Some(PropertyValue::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Type-safe getter for boolean properties.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Type-safe getter for string list properties.
    pub fn get_string_list(&self, key: &str) -> Option<&[String]> {
        match self.data.get(key) {
            Some(PropertyValue::StringList(list)) => Some(list),
            _ => None,
        }
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (String, PropertyValue)>>(iter: T) -> Self {
        Self {
            data: HashMap::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_conversions() {
        let s: PropertyValue = "Shop.Domain".into();
        assert!(matches!(s, PropertyValue::String(_)));

        let i: PropertyValue = 42i64.into();
        assert!(matches!(i, PropertyValue::Int(42)));

        let f: PropertyValue = 0.75.into();
        assert!(matches!(f, PropertyValue::Float(_)));

        let b: PropertyValue = true.into();
        assert!(matches!(b, PropertyValue::Bool(true)));
    }

    #[test]
    fn test_property_map_builder() {
        let props = PropertyMap::new()
            .with(keys::NAMESPACE, "Shop.Web")
            .with(keys::LINES_OF_CODE, 120i64)
            .with(keys::IS_PUBLIC, true);

        assert_eq!(props.get_string(keys::NAMESPACE), Some("Shop.Web"));
        assert_eq!(props.get_int(keys::LINES_OF_CODE), Some(120));
        assert_eq!(props.get_bool(keys::IS_PUBLIC), Some(true));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_property_map_type_safety() {
        let props = PropertyMap::new()
            .with("name", "OrderService")
            .with("line", 10i64);

        // Wrong kind returns None
        assert_eq!(props.get_int("name"), None);
        assert_eq!(props.get_string("line"), None);
        assert_eq!(props.get_bool("name"), None);
    }

    #[test]
    fn test_get_float_widens_int() {
        let props = PropertyMap::new()
            .with(keys::CONFIDENCE, 1i64)
            .with("score", 0.5);

        assert_eq!(props.get_float(keys::CONFIDENCE), Some(1.0));
        assert_eq!(props.get_float("score"), Some(0.5));
    }

    #[test]
    fn test_property_map_lists() {
        let props = PropertyMap::new().with(
            "attributes",
            vec!["Table".to_string(), "Serializable".to_string()],
        );

        assert_eq!(props.get_string_list("attributes").map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_property_map_json_is_plain_values() {
        let props = PropertyMap::new().with(keys::IS_PUBLIC, false);
        let json = serde_json::to_value(&props).unwrap();

        assert_eq!(json[keys::IS_PUBLIC], serde_json::json!(false));
    }
}
