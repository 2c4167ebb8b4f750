/*
 * melt.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Depth-first flattening of configuration trees into leaf records.
 */

//! Depth-first flattening of a configuration tree.
//!
//! Melting walks the tree in each container's natural order, never sorting,
//! and emits one [`LeafRecord`] per scalar leaf. The record order is what a
//! tree view displays and what reconstruction replays, so it must be stable:
//! melting the same document twice gives identical output.
//!
//! # Depth Limiting
//!
//! Melting enforces a maximum depth to keep pathological inputs from
//! overflowing the stack. The default limit is 256 levels.

use serde::Serialize;
use tracing::debug;

use crate::error::MeltError;
use crate::path::{Path, PathSegment, is_reserved_key};
use crate::types::{ConfigDocument, Node, Scalar, ScalarType};

/// One scalar leaf with its address and declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafRecord {
    /// Segments from the root to the leaf's parent container.
    pub path: Path,
    /// The leaf's own key within its parent.
    pub leaf_key: PathSegment,
    pub value: Scalar,
    pub declared_type: ScalarType,
}

impl LeafRecord {
    /// `path + [leaf_key]`: the address of this leaf.
    pub fn full_path(&self) -> Path {
        let mut full = Vec::with_capacity(self.path.len() + 1);
        full.extend(self.path.iter().cloned());
        full.push(self.leaf_key.clone());
        full
    }

    /// The first segment of the full path, as a key.
    ///
    /// For records melted from a [`ConfigDocument`] this is the section name.
    pub fn section(&self) -> Option<&str> {
        self.path.first().unwrap_or(&self.leaf_key).as_key()
    }
}

/// Options for melting.
#[derive(Debug, Clone)]
pub struct MeltOptions {
    /// Maximum nesting depth (default: 256).
    pub max_depth: usize,

    /// Fail with [`MeltError::AmbiguousKey`] when a literal key starts with
    /// the index prefix (default: true).
    pub reject_reserved_keys: bool,
}

impl Default for MeltOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            reject_reserved_keys: true,
        }
    }
}

/// Melt with default options.
///
/// A scalar root yields no records: it has no key to be addressed by.
pub fn melt(node: &Node) -> Result<Vec<LeafRecord>, MeltError> {
    melt_with_options(node, &MeltOptions::default())
}

/// Melt with custom options.
pub fn melt_with_options(node: &Node, options: &MeltOptions) -> Result<Vec<LeafRecord>, MeltError> {
    let mut melter = Melter {
        options,
        stack: Vec::new(),
        records: Vec::new(),
    };
    melter.walk(node, 0)?;
    debug!(leaves = melter.records.len(), "Melted configuration tree");
    Ok(melter.records)
}

impl ConfigDocument {
    /// Melt every section in order. Paths start with the section name.
    pub fn melt(&self) -> Result<Vec<LeafRecord>, MeltError> {
        melt(&self.root)
    }

    /// Melt every section with custom options.
    pub fn melt_with_options(&self, options: &MeltOptions) -> Result<Vec<LeafRecord>, MeltError> {
        melt_with_options(&self.root, options)
    }
}

struct Melter<'o> {
    options: &'o MeltOptions,
    stack: Path,
    records: Vec<LeafRecord>,
}

impl Melter<'_> {
    fn walk(&mut self, node: &Node, depth: usize) -> Result<(), MeltError> {
        if depth > self.options.max_depth {
            return Err(MeltError::NestingTooDeep {
                max_depth: self.options.max_depth,
                path: self.stack.clone(),
            });
        }

        for (key, child) in keyed_children(node) {
            if let PathSegment::MapKey(literal) = &key {
                if self.options.reject_reserved_keys && is_reserved_key(literal) {
                    return Err(MeltError::AmbiguousKey {
                        path: self.stack.clone(),
                        key: literal.clone(),
                    });
                }
            }

            match child {
                Node::Scalar(value) => self.records.push(LeafRecord {
                    path: self.stack.clone(),
                    leaf_key: key,
                    value: value.clone(),
                    declared_type: value.declared_type(),
                }),
                container => {
                    self.stack.push(key);
                    let walked = self.walk(container, depth + 1);
                    self.stack.pop();
                    walked?;
                }
            }
        }
        Ok(())
    }
}

/// Children of a container keyed by the segment that addresses them.
///
/// This is the only place sequence semantics enter the walk: a sequence is
/// visited as if it were a map keyed by position.
fn keyed_children(node: &Node) -> Vec<(PathSegment, &Node)> {
    match node {
        Node::Map(entries) => entries
            .iter()
            .map(|(key, child)| (PathSegment::MapKey(key.clone()), child))
            .collect(),
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (PathSegment::ListIndex(index), child))
            .collect(),
        Node::Scalar(_) => Vec::new(),
    }
}
