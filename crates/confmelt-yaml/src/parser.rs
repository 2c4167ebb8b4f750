//! YAML parser that builds `Node` trees.

use std::collections::HashMap;

use confmelt_config::{Node, Scalar};
use indexmap::IndexMap;
use tracing::warn;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::{Error, Location, Result};

/// Parse a single YAML document into a `Node`.
///
/// An empty document yields a null scalar. If the input holds several
/// documents, only the first one is read.
///
/// Aliases are expanded into copies of their anchored node, so the result is
/// always a strict tree.
///
/// # Example
///
/// ```rust
/// use confmelt_yaml::parse;
///
/// let node = parse("debug: yes\nretries: 3").unwrap();
/// assert!(node.is_map());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid, or if it uses a construct that
/// has no `Node` equivalent (a mapping or sequence used as a key).
pub fn parse(content: &str) -> Result<Node> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::default();

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct a `Node`.
#[derive(Default)]
struct NodeBuilder {
    /// Containers still being filled
    stack: Vec<Frame>,

    /// Completed anchored nodes, by anchor id
    anchors: HashMap<usize, Node>,

    root: Option<Node>,

    /// First structural error; later events are ignored once this is set
    error: Option<Error>,
}

enum Frame {
    Sequence {
        anchor_id: usize,
        items: Vec<Node>,
    },
    Mapping {
        anchor_id: usize,
        entries: IndexMap<String, Node>,
        pending_key: Option<String>,
    },
}

impl NodeBuilder {
    fn result(self) -> Result<Node> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or_else(Node::null))
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        self.error = Some(Error::InvalidStructure {
            message: message.into(),
            location: Some(Location::from_marker(marker)),
        });
    }

    fn remember(&mut self, anchor_id: usize, node: &Node) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    /// Whether the innermost container is a mapping waiting for a key.
    fn expects_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => {
                    if entries.contains_key(&key) {
                        warn!(key = %key, "Duplicate mapping key; the last value wins");
                    }
                    entries.insert(key, node);
                }
                None => unreachable!("keys are consumed before values are pushed"),
            },
        }
    }

    fn set_key(&mut self, key: String) {
        if let Some(Frame::Mapping { pending_key, .. }) = self.stack.last_mut() {
            *pending_key = Some(key);
        }
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing => {}

            Event::StreamStart => {}
            Event::StreamEnd => {}
            Event::DocumentStart => {}
            Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor_id, tag) => {
                if self.expects_key() {
                    // Keys keep their source text whatever type they would resolve to.
                    let anchored = resolve_scalar(value.clone(), style, tag.as_ref())
                        .unwrap_or_else(|_| Scalar::String(value.clone()));
                    self.remember(anchor_id, &Node::Scalar(anchored));
                    self.set_key(value);
                    return;
                }

                match resolve_scalar(value, style, tag.as_ref()) {
                    Ok(scalar) => {
                        let node = Node::Scalar(scalar);
                        self.remember(anchor_id, &node);
                        self.push_complete(node);
                    }
                    Err(message) => self.fail(message, &marker),
                }
            }

            Event::SequenceStart(anchor_id, _tag) => {
                if self.expects_key() {
                    self.fail("a sequence cannot be used as a mapping key", &marker);
                    return;
                }
                self.stack.push(Frame::Sequence {
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::MappingStart(anchor_id, _tag) => {
                if self.expects_key() {
                    self.fail("a mapping cannot be used as a mapping key", &marker);
                    return;
                }
                self.stack.push(Frame::Mapping {
                    anchor_id,
                    entries: IndexMap::new(),
                    pending_key: None,
                });
            }

            Event::SequenceEnd | Event::MappingEnd => {
                let node = match self.stack.pop() {
                    Some(Frame::Sequence { anchor_id, items }) => {
                        let node = Node::Sequence(items);
                        self.remember(anchor_id, &node);
                        node
                    }
                    Some(Frame::Mapping {
                        anchor_id, entries, ..
                    }) => {
                        let node = Node::Map(entries);
                        self.remember(anchor_id, &node);
                        node
                    }
                    None => {
                        self.fail("container end without a start", &marker);
                        return;
                    }
                };
                self.push_complete(node);
            }

            Event::Alias(anchor_id) => {
                let Some(node) = self.anchors.get(&anchor_id).cloned() else {
                    self.fail("alias refers to an unknown anchor", &marker);
                    return;
                };
                if self.expects_key() {
                    match node {
                        Node::Scalar(scalar) => self.set_key(scalar.to_string()),
                        _ => self.fail("an aliased container cannot be used as a mapping key", &marker),
                    }
                } else {
                    self.push_complete(node);
                }
            }
        }
    }
}

/// Resolve a scalar event to a typed value.
///
/// Quoted and block scalars are always strings. Core schema tags
/// (`!!str`, `!!int`, `!!float`, `!!bool`, `!!null`) force a type; other
/// tags are ignored. Plain scalars are resolved by their text.
///
/// Fails on a plain integer that does not fit in an `i64`; reading it as a
/// float would rewrite it with less precision on the next save.
fn resolve_scalar(
    value: String,
    style: TScalarStyle,
    tag: Option<&Tag>,
) -> std::result::Result<Scalar, String> {
    if let Some(tag) = tag.filter(|t| is_core_tag(t)) {
        let forced = match tag.suffix.as_str() {
            "str" => Some(Scalar::String(value.clone())),
            "int" => value.trim().parse::<i64>().ok().map(Scalar::Integer),
            "float" => parse_float(value.trim()).map(Scalar::Float),
            "bool" => parse_bool(value.trim()).map(Scalar::Boolean),
            "null" => Some(Scalar::Null),
            _ => None,
        };
        if let Some(scalar) = forced {
            return Ok(scalar);
        }
    }

    if style != TScalarStyle::Plain {
        return Ok(Scalar::String(value));
    }
    resolve_plain(value)
}

fn is_core_tag(tag: &Tag) -> bool {
    tag.handle == "!!" || tag.handle == "tag:yaml.org,2002:"
}

/// Type inference for plain scalars: null, booleans, integers, floats, strings.
fn resolve_plain(value: String) -> std::result::Result<Scalar, String> {
    if matches!(value.as_str(), "null" | "Null" | "NULL" | "~" | "") {
        return Ok(Scalar::Null);
    }
    if let Some(b) = parse_bool(&value) {
        return Ok(Scalar::Boolean(b));
    }
    if let Ok(i) = value.parse::<i64>() {
        return Ok(Scalar::Integer(i));
    }
    if is_integer_literal(&value) {
        return Err(format!("integer out of range: {value}"));
    }
    if let Some(f) = parse_float(&value) {
        return Ok(Scalar::Float(f));
    }
    Ok(Scalar::String(value))
}

/// Optional sign followed by decimal digits only.
fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

fn parse_float(value: &str) -> Option<f64> {
    match value {
        // No "+.inf": the emitter leaves that text unquoted, so a string
        // holding it has to read back as a string.
        ".inf" | ".Inf" | ".INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust accepts "inf" and "NaN" spelled out; YAML does not.
    if !value.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<f64>().ok()
}
