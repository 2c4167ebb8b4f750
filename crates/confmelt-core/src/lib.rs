//! # confmelt-core
//!
//! The collaborators around the melt/store core: loading a directory of
//! per-section YAML files into a [`ConfigDocument`], resolving
//! environment-layered configuration, and an [`EditSession`] that keeps the
//! loaded, default and edited copies of a document apart.
//!
//! ```rust,no_run
//! use confmelt_core::{EditSession, EditorConfig};
//! use confmelt_config::ScalarType;
//!
//! let mut session = EditSession::open(EditorConfig::new("config")).unwrap();
//! let record = session.melt().unwrap().remove(0);
//! session
//!     .edit(&record.full_path(), "42", ScalarType::Integer)
//!     .unwrap();
//! session.save().unwrap();
//! ```
//!
//! [`ConfigDocument`]: confmelt_config::ConfigDocument

pub mod env;
pub mod error;
pub mod loader;
pub mod session;

pub use env::{EnvLoader, RunningEnv, deep_update, resolve_env};
pub use error::{Error, Result};
pub use loader::{
    SectionLoader, read_section, remove_section, save_document, save_section, section_name,
};
pub use session::{EditSession, EditorConfig};
