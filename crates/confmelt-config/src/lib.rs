//! Path-addressable flattening and point mutation of nested configuration.
//!
//! This crate is the substrate beneath any navigable editor for nested
//! configuration documents. It turns a tree of ordered maps, sequences and
//! scalars into a flat, ordered list of addressable leaves, and it reads,
//! replaces or removes any leaf or sub-tree by the same paths the flattening
//! produced.
//!
//! # Architecture
//!
//! - [`Node`] / [`Scalar`]: the document tree. Maps keep insertion order and
//!   booleans never collapse into integers.
//! - [`PathSegment`]: a typed path step, either a map key or a sequence index.
//!   The string form (`-LIST-: 3`) exists only at the boundary, see
//!   [`encode_segment`] and [`decode_segment`].
//! - [`melt`]: depth-first flattening into [`LeafRecord`]s.
//! - [`get`], [`set`], [`set_text`], [`delete`]: path-addressed access.
//! - [`project`]: deduplicated branch/leaf hierarchy for a tree view.
//!
//! # Example
//!
//! ```rust
//! use confmelt_config::{ConfigDocument, Node, Scalar, ScalarType};
//!
//! let mut doc = ConfigDocument::new();
//! doc.insert_section(
//!     "server",
//!     Node::from_entries([("port", Node::from(8080))]),
//! );
//!
//! let records = doc.melt().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].declared_type, ScalarType::Integer);
//!
//! let path = records[0].full_path();
//! doc.set_text(&path, "9090", ScalarType::Integer).unwrap();
//! assert_eq!(doc.get_scalar(&path).unwrap(), &Scalar::Integer(9090));
//! ```

mod coerce;
mod error;
mod melt;
mod path;
mod project;
mod store;
mod types;

pub use types::{ConfigDocument, Node, Scalar, ScalarType, UnknownScalarType};

pub use path::{
    LIST_KEY_PREFIX,
    Path,
    PathSegment,
    decode_path,
    decode_segment,
    encode_index,
    encode_path,
    encode_segment,
    is_reserved_key,
    join_path,
};

pub use error::{EditError, MalformedIndex, MeltError, PathError, ValueCoercionError};

pub use melt::{LeafRecord, MeltOptions, melt, melt_with_options};

pub use store::{delete, get, get_mut, get_scalar, set, set_text};

pub use project::{DisplayKind, DisplayNode, project, project_document};
