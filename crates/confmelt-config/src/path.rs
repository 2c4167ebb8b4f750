/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Typed path segments and their string encoding.
 */

//! Typed path segments and the string codec used at the boundary.
//!
//! Inside this crate a path is a `Vec<PathSegment>`, and a segment is always
//! either a map key or a sequence index. Text-based collaborators (a tree
//! widget, a command line, JSON) exchange segments as plain strings: a
//! sequence index is written as [`LIST_KEY_PREFIX`] followed by the decimal
//! position, every other string is a map key.
//!
//! The string form is ambiguous for a literal key that itself starts with
//! the prefix. [`melt`](crate::melt) rejects such keys by default so that
//! every path it hands out survives the round trip through strings.

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::error::MalformedIndex;

/// Reserved prefix marking a sequence index in the string encoding.
pub const LIST_KEY_PREFIX: &str = "-LIST-: ";

/// Separator used by [`join_path`] for display.
const DISPLAY_SEPARATOR: &str = "/";

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Index into a map by key.
    MapKey(String),
    /// Index into a sequence by position.
    ListIndex(usize),
}

/// Root-to-node sequence of segments.
pub type Path = Vec<PathSegment>;

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::MapKey(key.into())
    }

    pub fn index(index: usize) -> Self {
        PathSegment::ListIndex(index)
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::MapKey(key) => Some(key),
            PathSegment::ListIndex(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::MapKey(_) => None,
            PathSegment::ListIndex(index) => Some(*index),
        }
    }

    /// The string form of this segment.
    pub fn encode(&self) -> Cow<'_, str> {
        match self {
            PathSegment::MapKey(key) => Cow::Borrowed(key),
            PathSegment::ListIndex(index) => Cow::Owned(encode_index(*index)),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::ListIndex(index)
    }
}

impl From<&str> for PathSegment {
    /// A literal map key. Use [`decode_segment`] for encoded strings.
    fn from(key: &str) -> Self {
        PathSegment::MapKey(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::MapKey(key)
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for PathSegment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode_segment(&raw).map_err(de::Error::custom)
    }
}

/// Encode a sequence position as a segment string.
pub fn encode_index(index: usize) -> String {
    format!("{LIST_KEY_PREFIX}{index}")
}

/// Encode one segment.
pub fn encode_segment(segment: &PathSegment) -> String {
    segment.encode().into_owned()
}

/// Decode a segment string.
///
/// A string carrying [`LIST_KEY_PREFIX`] must continue with a non-negative
/// decimal integer; anything else is a map key.
pub fn decode_segment(segment: &str) -> Result<PathSegment, MalformedIndex> {
    match segment.strip_prefix(LIST_KEY_PREFIX) {
        Some(digits) => digits
            .parse::<usize>()
            .map(PathSegment::ListIndex)
            .map_err(|_| MalformedIndex {
                segment: segment.to_string(),
            }),
        None => Ok(PathSegment::MapKey(segment.to_string())),
    }
}

/// Encode every segment of a path.
pub fn encode_path(path: &[PathSegment]) -> Vec<String> {
    path.iter().map(encode_segment).collect()
}

/// Decode a sequence of segment strings into a path.
pub fn decode_path<I, S>(segments: I) -> Result<Path, MalformedIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .map(|segment| decode_segment(segment.as_ref()))
        .collect()
}

/// Whether a literal map key collides with the index encoding.
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(LIST_KEY_PREFIX)
}

/// Human-readable rendering of a path, for messages and logs only.
///
/// This is not a parseable form: keys may themselves contain the separator.
pub fn join_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.iter()
        .map(|segment| segment.encode())
        .collect::<Vec<_>>()
        .join(DISPLAY_SEPARATOR)
}
