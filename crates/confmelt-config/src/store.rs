/*
 * store.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Path-addressed read, replace and delete.
 */

//! Path-addressed access to a configuration tree.
//!
//! Every operation resolves its path with the same two step functions, one
//! shared and one mutable, so the store always decodes a segment the way the
//! melter encoded it. Mutating operations resolve the full path before they
//! touch anything: a failed call leaves the tree exactly as it was.

use tracing::trace;

use crate::error::{EditError, PathError};
use crate::path::PathSegment;
use crate::types::{ConfigDocument, Node, Scalar, ScalarType};

/// Resolve `path` from `root`. An empty path returns `root`.
pub fn get<'a>(root: &'a Node, path: &[PathSegment]) -> Result<&'a Node, PathError> {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        node = step(node, segment, &path[..depth])?;
    }
    Ok(node)
}

/// Mutable variant of [`get`].
pub fn get_mut<'a>(root: &'a mut Node, path: &[PathSegment]) -> Result<&'a mut Node, PathError> {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        node = step_mut(node, segment, &path[..depth])?;
    }
    Ok(node)
}

/// Resolve `path` and require a scalar there.
pub fn get_scalar<'a>(root: &'a Node, path: &[PathSegment]) -> Result<&'a Scalar, PathError> {
    match get(root, path)? {
        Node::Scalar(value) => Ok(value),
        other => Err(PathError::NotAScalar {
            path: path.to_vec(),
            found: other.kind_name(),
        }),
    }
}

/// Replace the node at `path` in place.
///
/// The terminal key or position must already exist: `set` never creates
/// containers, never appends and never reorders.
pub fn set(root: &mut Node, path: &[PathSegment], value: Node) -> Result<(), PathError> {
    let Some((last, parent_path)) = path.split_last() else {
        return Err(PathError::EmptyPath);
    };
    let parent = get_mut(root, parent_path)?;
    let slot = step_mut(parent, last, parent_path)?;
    trace!(path = ?path, "Replacing node");
    *slot = value;
    Ok(())
}

/// Coerce `text` to `declared`, then [`set`] the resulting scalar.
///
/// Returns the stored value. Nothing is mutated when either step fails.
pub fn set_text(
    root: &mut Node,
    path: &[PathSegment],
    text: &str,
    declared: ScalarType,
) -> Result<Scalar, EditError> {
    let value = Scalar::coerce(text, declared)?;
    set(root, path, Node::Scalar(value.clone()))?;
    Ok(value)
}

/// Remove the node at `path` and return it.
///
/// Map entries after the removed key keep their order; sequence elements
/// after the removed position shift down by one.
pub fn delete(root: &mut Node, path: &[PathSegment]) -> Result<Node, PathError> {
    let Some((last, parent_path)) = path.split_last() else {
        return Err(PathError::EmptyPath);
    };
    let parent = get_mut(root, parent_path)?;

    match (parent, last) {
        (Node::Map(entries), PathSegment::MapKey(key)) => {
            entries
                .shift_remove(key)
                .ok_or_else(|| PathError::KeyNotFound {
                    path: parent_path.to_vec(),
                    key: key.clone(),
                })
        }
        (Node::Sequence(items), PathSegment::ListIndex(index)) => {
            if *index < items.len() {
                Ok(items.remove(*index))
            } else {
                Err(PathError::IndexOutOfRange {
                    path: parent_path.to_vec(),
                    index: *index,
                    len: items.len(),
                })
            }
        }
        (other, segment) => Err(mismatch(other, segment, parent_path)),
    }
}

fn step<'a>(node: &'a Node, segment: &PathSegment, at: &[PathSegment]) -> Result<&'a Node, PathError> {
    match (node, segment) {
        (Node::Map(entries), PathSegment::MapKey(key)) => {
            entries.get(key).ok_or_else(|| PathError::KeyNotFound {
                path: at.to_vec(),
                key: key.clone(),
            })
        }
        (Node::Sequence(items), PathSegment::ListIndex(index)) => {
            items.get(*index).ok_or_else(|| PathError::IndexOutOfRange {
                path: at.to_vec(),
                index: *index,
                len: items.len(),
            })
        }
        (other, segment) => Err(mismatch(other, segment, at)),
    }
}

fn step_mut<'a>(
    node: &'a mut Node,
    segment: &PathSegment,
    at: &[PathSegment],
) -> Result<&'a mut Node, PathError> {
    match (node, segment) {
        (Node::Map(entries), PathSegment::MapKey(key)) => {
            entries.get_mut(key).ok_or_else(|| PathError::KeyNotFound {
                path: at.to_vec(),
                key: key.clone(),
            })
        }
        (Node::Sequence(items), PathSegment::ListIndex(index)) => {
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or_else(|| PathError::IndexOutOfRange {
                    path: at.to_vec(),
                    index: *index,
                    len,
                })
        }
        (other, segment) => Err(mismatch(other, segment, at)),
    }
}

fn mismatch(node: &Node, segment: &PathSegment, at: &[PathSegment]) -> PathError {
    PathError::TypeMismatch {
        path: at.to_vec(),
        segment: segment.clone(),
        found: node.kind_name(),
    }
}

impl ConfigDocument {
    /// Resolve a path whose first segment is a section name.
    pub fn get(&self, path: &[PathSegment]) -> Result<&Node, PathError> {
        get(&self.root, path)
    }

    pub fn get_scalar(&self, path: &[PathSegment]) -> Result<&Scalar, PathError> {
        get_scalar(&self.root, path)
    }

    /// Replace the node at `path`. See [`set`].
    pub fn set(&mut self, path: &[PathSegment], value: Node) -> Result<(), PathError> {
        set(&mut self.root, path, value)
    }

    /// Coerce and replace a scalar. See [`set_text`].
    pub fn set_text(
        &mut self,
        path: &[PathSegment],
        text: &str,
        declared: ScalarType,
    ) -> Result<Scalar, EditError> {
        set_text(&mut self.root, path, text, declared)
    }

    /// Remove the node at `path`. A one-segment path removes a whole section.
    pub fn delete(&mut self, path: &[PathSegment]) -> Result<Node, PathError> {
        delete(&mut self.root, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::key(k)
    }

    fn idx(i: usize) -> PathSegment {
        PathSegment::index(i)
    }

    fn sample() -> Node {
        Node::from_entries([
            ("name", Node::from("svc")),
            (
                "hosts",
                Node::from_items([Node::from("a"), Node::from("b"), Node::from("c")]),
            ),
            (
                "db",
                Node::from_entries([("port", Node::from(5432)), ("ssl", Node::from(true))]),
            ),
        ])
    }

    #[test]
    fn test_get_resolves_keys_and_indices() {
        let node = sample();
        assert_eq!(get(&node, &[]).unwrap(), &node);
        assert_eq!(get(&node, &[key("hosts"), idx(1)]).unwrap(), &Node::from("b"));
        assert_eq!(
            get_scalar(&node, &[key("db"), key("port")]).unwrap(),
            &Scalar::Integer(5432)
        );
    }

    #[test]
    fn test_get_errors() {
        let node = sample();

        assert_eq!(
            get(&node, &[key("db"), key("user")]).unwrap_err(),
            PathError::KeyNotFound {
                path: vec![key("db")],
                key: "user".into(),
            }
        );
        assert_eq!(
            get(&node, &[key("hosts"), idx(3)]).unwrap_err(),
            PathError::IndexOutOfRange {
                path: vec![key("hosts")],
                index: 3,
                len: 3,
            }
        );
        assert!(matches!(
            get(&node, &[key("hosts"), key("0")]).unwrap_err(),
            PathError::TypeMismatch { found: "sequence", .. }
        ));
        assert!(matches!(
            get(&node, &[key("db"), idx(0)]).unwrap_err(),
            PathError::TypeMismatch { found: "map", .. }
        ));
        assert!(matches!(
            get(&node, &[key("name"), key("x")]).unwrap_err(),
            PathError::TypeMismatch { found: "scalar", .. }
        ));
        assert!(matches!(
            get_scalar(&node, &[key("db")]).unwrap_err(),
            PathError::NotAScalar { found: "map", .. }
        ));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut node = sample();
        set(&mut node, &[key("name")], Node::from("renamed")).unwrap();
        set(&mut node, &[key("hosts"), idx(0)], Node::from(7)).unwrap();

        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "hosts", "db"]);
        assert_eq!(get(&node, &[key("name")]).unwrap(), &Node::from("renamed"));
        assert_eq!(get(&node, &[key("hosts")]).unwrap().as_sequence().unwrap().len(), 3);
        assert_eq!(get(&node, &[key("hosts"), idx(0)]).unwrap(), &Node::from(7));
    }

    #[test]
    fn test_set_never_inserts() {
        let mut node = sample();
        let before = node.clone();

        assert!(set(&mut node, &[key("db"), key("user")], Node::from("x")).is_err());
        assert!(set(&mut node, &[key("hosts"), idx(3)], Node::from("d")).is_err());
        assert!(set(&mut node, &[key("missing"), key("x")], Node::from(1)).is_err());
        assert_eq!(set(&mut node, &[], Node::null()), Err(PathError::EmptyPath));
        assert_eq!(node, before);
    }

    #[test]
    fn test_set_text_coerces_before_mutating() {
        let mut node = sample();
        let before = node.clone();

        let err = set_text(&mut node, &[key("db"), key("port")], "12x", ScalarType::Integer)
            .unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(node, before);

        let stored = set_text(&mut node, &[key("db"), key("port")], " 6543 ", ScalarType::Integer)
            .unwrap();
        assert_eq!(stored, Scalar::Integer(6543));
        assert_eq!(
            get_scalar(&node, &[key("db"), key("port")]).unwrap(),
            &Scalar::Integer(6543)
        );
    }

    #[test]
    fn test_set_text_bad_path_is_not_user_error() {
        let mut node = sample();
        let err = set_text(&mut node, &[key("nope")], "1", ScalarType::Integer).unwrap_err();
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_delete_map_key_keeps_order() {
        let mut node = sample();
        let removed = delete(&mut node, &[key("hosts")]).unwrap();
        assert_eq!(removed.as_sequence().unwrap().len(), 3);

        let keys: Vec<_> = node.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "db"]);
    }

    #[test]
    fn test_delete_sequence_element_shifts() {
        let mut node = sample();
        let removed = delete(&mut node, &[key("hosts"), idx(0)]).unwrap();
        assert_eq!(removed, Node::from("a"));
        assert_eq!(
            get(&node, &[key("hosts")]).unwrap(),
            &Node::from_items([Node::from("b"), Node::from("c")])
        );
    }

    #[test]
    fn test_delete_errors_leave_tree_untouched() {
        let mut node = sample();
        let before = node.clone();

        assert!(delete(&mut node, &[key("hosts"), idx(9)]).is_err());
        assert!(delete(&mut node, &[key("db"), key("nope")]).is_err());
        assert!(delete(&mut node, &[key("db"), idx(0)]).is_err());
        assert_eq!(delete(&mut node, &[]), Err(PathError::EmptyPath));
        assert_eq!(node, before);
    }

    #[test]
    fn test_document_delegates() {
        let mut doc = ConfigDocument::new();
        doc.insert_section("s", sample());
        doc.insert_section("t", Node::from(1));

        assert_eq!(
            doc.get_scalar(&[key("s"), key("db"), key("ssl")]).unwrap(),
            &Scalar::Boolean(true)
        );
        doc.set_text(&[key("t")], "2", ScalarType::Integer).unwrap();
        assert_eq!(doc.section("t"), Some(&Node::from(2)));

        doc.delete(&[key("s")]).unwrap();
        assert_eq!(doc.section_names(), vec!["t"]);
    }
}
