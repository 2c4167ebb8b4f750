//! Core type definitions for configuration documents.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A node in a configuration document.
///
/// Documents are strict trees: every container exclusively owns its
/// children, so there is no sharing and no cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Ordered mapping from string key to node. Insertion order is significant.
    Map(IndexMap<String, Node>),

    /// Ordered list of nodes. Position is significant.
    Sequence(Vec<Node>),

    /// A leaf value.
    Scalar(Scalar),
}

/// A scalar leaf value.
///
/// `Boolean` and `Integer` are distinct even though a boolean could be
/// represented as 0/1.
///
/// Serializes as the plain value. JSON has no NaN or infinity, so those
/// floats serialize as their YAML spellings `.nan`, `.inf` and `-.inf`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

/// The declared type of a leaf: what an edit of that leaf must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

/// A configuration document: a root map from section name to section tree.
///
/// Each section normally comes from one file. Paths into a document always
/// start with the section name.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    /// Always a `Node::Map`.
    pub(crate) root: Node,
}

impl Node {
    /// An empty map.
    pub fn map() -> Self {
        Node::Map(IndexMap::new())
    }

    /// An empty sequence.
    pub fn sequence() -> Self {
        Node::Sequence(Vec::new())
    }

    /// A null scalar.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Build a map from `(key, node)` pairs, keeping their order.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a sequence from nodes.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Sequence(items.into_iter().collect())
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Look up a direct child of a map by key.
    pub fn get_key(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Human-readable name of the node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Map(_) => "map",
            Node::Sequence(_) => "sequence",
            Node::Scalar(_) => "scalar",
        }
    }

    /// Number of scalar leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Map(entries) => entries.values().map(Node::leaf_count).sum(),
            Node::Sequence(items) => items.iter().map(Node::leaf_count).sum(),
            Node::Scalar(_) => 1,
        }
    }

    /// A copy with the same shape where every scalar is `Null`.
    ///
    /// Setting every leaf of `melt(self)` into the shadow rebuilds `self`.
    pub fn shadow(&self) -> Node {
        match self {
            Node::Map(entries) => Node::Map(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), child.shadow()))
                    .collect(),
            ),
            Node::Sequence(items) => Node::Sequence(items.iter().map(Node::shadow).collect()),
            Node::Scalar(_) => Node::null(),
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::String(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(Scalar::Integer(i64::from(value)))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Boolean(value))
    }
}

impl Scalar {
    /// The declared type of this value.
    ///
    /// Booleans report `Boolean`, never `Integer`.
    pub fn declared_type(&self) -> ScalarType {
        match self {
            Scalar::String(_) => ScalarType::String,
            Scalar::Integer(_) => ScalarType::Integer,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Boolean(_) => ScalarType::Boolean,
            Scalar::Null => ScalarType::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional part (`1.0`, not `1`).
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(x) if x.is_nan() => serializer.serialize_str(".nan"),
            Scalar::Float(x) if x.is_infinite() => {
                serializer.serialize_str(if *x > 0.0 { ".inf" } else { "-.inf" })
            }
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Boolean(b) => serializer.serialize_bool(*b),
            Scalar::Null => serializer.serialize_unit(),
        }
    }
}

impl ScalarType {
    pub const ALL: [ScalarType; 5] = [
        ScalarType::String,
        ScalarType::Integer,
        ScalarType::Float,
        ScalarType::Boolean,
        ScalarType::Null,
    ];

    /// Display name, as offered to users when picking a type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Boolean => "bool",
            ScalarType::Null => "none",
        }
    }

    /// Message shown when user input does not parse as this type.
    pub fn coercion_hint(&self) -> &'static str {
        match self {
            ScalarType::Integer => "Value must be integer number.",
            ScalarType::Float => "Value must be floating point number.",
            ScalarType::Boolean => "Value must be true or false.",
            ScalarType::String => "Value must be a string.",
            ScalarType::Null => "Value must be empty.",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScalarType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned when a declared type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scalar type {0:?} (expected one of: string, integer, float, bool, none)")]
pub struct UnknownScalarType(pub String);

impl FromStr for ScalarType {
    type Err = UnknownScalarType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ScalarType::String),
            "integer" | "int" => Ok(ScalarType::Integer),
            "float" => Ok(ScalarType::Float),
            "bool" | "boolean" => Ok(ScalarType::Boolean),
            "none" | "null" => Ok(ScalarType::Null),
            _ => Err(UnknownScalarType(s.to_string())),
        }
    }
}

impl ConfigDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self { root: Node::map() }
    }

    /// Build a document from sections, keeping their order.
    pub fn from_sections(sections: IndexMap<String, Node>) -> Self {
        Self {
            root: Node::Map(sections),
        }
    }

    /// Insert or replace a section. A replaced section keeps its position.
    pub fn insert_section(&mut self, name: impl Into<String>, section: Node) -> Option<Node> {
        self.sections_mut().insert(name.into(), section)
    }

    pub fn section(&self, name: &str) -> Option<&Node> {
        self.root.get_key(name)
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.root
            .as_map()
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.root.as_map().map_or(0, IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root map, for handing to the path-addressed free functions.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the document, returning its sections.
    pub fn into_sections(self) -> IndexMap<String, Node> {
        match self.root {
            Node::Map(entries) => entries,
            _ => IndexMap::new(),
        }
    }

    fn sections_mut(&mut self) -> &mut IndexMap<String, Node> {
        if !self.root.is_map() {
            self.root = Node::map();
        }
        match &mut self.root {
            Node::Map(entries) => entries,
            _ => unreachable!("root was just made a map"),
        }
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl From<IndexMap<String, Node>> for ConfigDocument {
    fn from(sections: IndexMap<String, Node>) -> Self {
        Self::from_sections(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_is_not_integer() {
        assert_eq!(Scalar::Boolean(true).declared_type(), ScalarType::Boolean);
        assert_eq!(Scalar::Integer(1).declared_type(), ScalarType::Integer);
        assert_ne!(Scalar::Boolean(true), Scalar::Integer(1));
    }

    #[test]
    fn test_from_entries_keeps_order() {
        let node = Node::from_entries([("z", Node::from(1)), ("a", Node::from(2))]);
        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_leaf_count() {
        let node = Node::from_entries([
            ("a", Node::from_items([Node::from(1), Node::from(true)])),
            ("b", Node::from_entries([("c", Node::null())])),
            ("empty", Node::map()),
        ]);
        assert_eq!(node.leaf_count(), 3);
    }

    #[test]
    fn test_shadow_keeps_shape() {
        let node = Node::from_entries([
            ("a", Node::from_items([Node::from(1), Node::from("x")])),
            ("b", Node::sequence()),
        ]);
        let shadow = node.shadow();
        assert_eq!(
            shadow,
            Node::from_entries([
                ("a", Node::from_items([Node::null(), Node::null()])),
                ("b", Node::sequence()),
            ])
        );
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Boolean(false).to_string(), "false");
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_scalar_type_from_str() {
        assert_eq!("integer".parse::<ScalarType>(), Ok(ScalarType::Integer));
        assert_eq!("INT".parse::<ScalarType>(), Ok(ScalarType::Integer));
        assert_eq!("bool".parse::<ScalarType>(), Ok(ScalarType::Boolean));
        assert_eq!("none".parse::<ScalarType>(), Ok(ScalarType::Null));
        assert!("decimal".parse::<ScalarType>().is_err());

        for ty in ScalarType::ALL {
            assert_eq!(ty.as_str().parse::<ScalarType>(), Ok(ty));
        }
    }

    #[test]
    fn test_document_sections_in_order() {
        let mut doc = ConfigDocument::new();
        doc.insert_section("logging", Node::map());
        doc.insert_section("database", Node::map());
        assert_eq!(doc.section_names(), vec!["logging", "database"]);

        // Replacing keeps the original position.
        doc.insert_section("logging", Node::from(1));
        assert_eq!(doc.section_names(), vec!["logging", "database"]);
        assert_eq!(doc.section("logging"), Some(&Node::from(1)));
    }

    #[test]
    fn test_serialize_node_as_plain_json() {
        let node = Node::from_entries([
            ("flag", Node::from(true)),
            ("count", Node::from(3)),
            ("items", Node::from_items([Node::from("a"), Node::null()])),
        ]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"flag":true,"count":3,"items":["a",null]}"#);
    }

    #[test]
    fn test_non_finite_floats_serialize_as_yaml_spellings() {
        let node = Node::from_items([
            Node::from(f64::NAN),
            Node::from(f64::INFINITY),
            Node::from(f64::NEG_INFINITY),
            Node::from(0.5),
        ]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"[".nan",".inf","-.inf",0.5]"#);
    }
}
