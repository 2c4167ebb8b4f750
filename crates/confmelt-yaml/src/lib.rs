//! # confmelt-yaml
//!
//! YAML text to and from confmelt [`Node`] trees.
//!
//! The parser builds a `Node` directly from `yaml-rust2` events, so map
//! entries keep the order they have in the file and scalars keep their type:
//! a quoted `"8080"` stays a string while a plain `8080` becomes an integer.
//! The emitter quotes any string that would otherwise read back as another
//! type, so `parse(emit(node)) == node`.
//!
//! ## Example
//!
//! ```rust
//! use confmelt_yaml::{emit, parse};
//!
//! let node = parse("port: 8080\nname: '8080'\n").unwrap();
//! let text = emit(&node).unwrap();
//! assert_eq!(parse(&text).unwrap(), node);
//! ```

mod emitter;
mod error;
mod parser;

pub use confmelt_config::Node;
pub use emitter::{emit, to_yaml};
pub use error::{Error, Location, Result};
pub use parser::parse;
