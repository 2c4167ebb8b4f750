//! Error types for melting and path-addressed access.

use thiserror::Error;

use crate::path::{LIST_KEY_PREFIX, Path, PathSegment, join_path};
use crate::types::ScalarType;

/// A segment carries the index prefix but no valid index after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed index segment {segment:?}: expected {:?} followed by a non-negative integer", LIST_KEY_PREFIX)]
pub struct MalformedIndex {
    /// The offending segment string
    pub segment: String,
}

/// A path does not resolve against the document.
///
/// Paths handed out by `melt` always resolve against the document they were
/// melted from, so these errors mean the path and the document have drifted
/// apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Key {key:?} not found at {}", join_path(path))]
    KeyNotFound {
        /// Path of the map that was searched
        path: Path,
        key: String,
    },

    #[error("Index {index} out of range for sequence of length {len} at {}", join_path(path))]
    IndexOutOfRange {
        /// Path of the sequence that was indexed
        path: Path,
        index: usize,
        len: usize,
    },

    #[error("Segment {segment} cannot address into a {found} at {}", join_path(path))]
    TypeMismatch {
        /// Path of the node the segment was applied to
        path: Path,
        segment: PathSegment,
        found: &'static str,
    },

    #[error("{} addresses a {found}, not a scalar", join_path(path))]
    NotAScalar { path: Path, found: &'static str },

    #[error("An empty path addresses the root, which cannot be replaced or removed")]
    EmptyPath,
}

/// Melting refused the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeltError {
    /// A literal key would be read back as a sequence index.
    #[error("Map key {key:?} at {} starts with the reserved index prefix {:?}", join_path(path), LIST_KEY_PREFIX)]
    AmbiguousKey {
        /// Path of the map holding the key
        path: Path,
        key: String,
    },

    #[error("Config nesting too deep (max depth: {max_depth}) at {}", join_path(path))]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Path where the limit was exceeded
        path: Path,
    },
}

/// User input does not parse as the declared type of the leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", expected.coercion_hint())]
pub struct ValueCoercionError {
    /// The text that was rejected
    pub input: String,
    /// The type it had to parse as
    pub expected: ScalarType,
}

/// Failure of a text edit: either the input or the path was bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Coercion(#[from] ValueCoercionError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl EditError {
    /// True for errors caused by ordinary user input.
    ///
    /// Everything else is a broken path/document pairing.
    pub fn is_user_error(&self) -> bool {
        matches!(self, EditError::Coercion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_messages() {
        let err = PathError::KeyNotFound {
            path: vec![PathSegment::key("s"), PathSegment::index(0)],
            key: "port".into(),
        };
        assert_eq!(err.to_string(), r#"Key "port" not found at s/-LIST-: 0"#);

        let err = PathError::IndexOutOfRange {
            path: vec![PathSegment::key("s")],
            index: 5,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Index 5 out of range for sequence of length 2 at s"
        );
    }

    #[test]
    fn test_coercion_message() {
        let err = ValueCoercionError {
            input: "12x".into(),
            expected: ScalarType::Integer,
        };
        assert_eq!(err.to_string(), "Value must be integer number.");
        assert!(EditError::from(err).is_user_error());
        assert!(!EditError::from(PathError::EmptyPath).is_user_error());
    }
}
