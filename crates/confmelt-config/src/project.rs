//! Projection of leaf records into a deduplicated display hierarchy.
//!
//! A tree widget needs every intermediate container exactly once, before
//! its first leaf, and the leaves in document order. The projector derives
//! that list from melt output alone: for each record it walks the prefixes
//! of `path + [leaf_key]` and emits the ones it has not seen yet.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::Serialize;

use crate::error::MeltError;
use crate::melt::LeafRecord;
use crate::path::{Path, PathSegment};
use crate::types::{ConfigDocument, Scalar, ScalarType};

/// One row of the display hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayNode {
    /// Full path of this node. Its parent is the branch minus the last segment.
    pub branch: Path,
    #[serde(flatten)]
    pub kind: DisplayKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayKind {
    /// An intermediate container. Carries no value.
    Branch,
    /// A scalar leaf.
    Leaf {
        value: Scalar,
        declared_type: ScalarType,
    },
}

impl DisplayNode {
    /// Nesting depth; top-level nodes have depth 1.
    pub fn depth(&self) -> usize {
        self.branch.len()
    }

    /// The last segment in its string form.
    pub fn label(&self) -> Cow<'_, str> {
        self.branch
            .last()
            .map_or(Cow::Borrowed(""), PathSegment::encode)
    }

    pub fn parent(&self) -> &[PathSegment] {
        match self.branch.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, DisplayKind::Leaf { .. })
    }

    pub fn value(&self) -> Option<&Scalar> {
        match &self.kind {
            DisplayKind::Leaf { value, .. } => Some(value),
            DisplayKind::Branch => None,
        }
    }

    pub fn declared_type(&self) -> Option<ScalarType> {
        match &self.kind {
            DisplayKind::Leaf { declared_type, .. } => Some(*declared_type),
            DisplayKind::Branch => None,
        }
    }
}

/// Build the display hierarchy for a list of records, in record order.
pub fn project(records: &[LeafRecord]) -> Vec<DisplayNode> {
    let mut projector = Projector::default();
    for record in records {
        projector.push(record);
    }
    projector.nodes
}

/// Melt and project a whole document.
///
/// Every non-scalar section gets a branch of its own, before its leaves,
/// so a section without any leaves still shows up.
pub fn project_document(document: &ConfigDocument) -> Result<Vec<DisplayNode>, MeltError> {
    let records = document.melt()?;
    let mut records = records.iter().peekable();
    let mut projector = Projector::default();

    for (name, section) in document.sections() {
        if !section.is_scalar() {
            projector.branch(vec![PathSegment::key(name)]);
        }
        while let Some(record) = records.next_if(|r| r.section() == Some(name)) {
            projector.push(record);
        }
    }

    Ok(projector.nodes)
}

#[derive(Default)]
struct Projector {
    seen: HashSet<Path>,
    nodes: Vec<DisplayNode>,
}

impl Projector {
    fn push(&mut self, record: &LeafRecord) {
        let full = record.full_path();
        for end in 1..full.len() {
            if !self.seen.contains(&full[..end]) {
                self.branch(full[..end].to_vec());
            }
        }
        if self.seen.insert(full.clone()) {
            self.nodes.push(DisplayNode {
                branch: full,
                kind: DisplayKind::Leaf {
                    value: record.value.clone(),
                    declared_type: record.declared_type,
                },
            });
        }
    }

    fn branch(&mut self, branch: Path) {
        if self.seen.insert(branch.clone()) {
            self.nodes.push(DisplayNode {
                branch,
                kind: DisplayKind::Branch,
            });
        }
    }
}
