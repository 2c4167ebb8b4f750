//! Command implementations for the confmelt CLI
//!
//! Each command module handles the CLI interface and delegates to
//! confmelt-core for the actual work.

pub mod delete;
pub mod get;
pub mod melt;
pub mod reset;
pub mod resolve;
pub mod set;
pub mod tree;

use anyhow::{Context, Result};
use confmelt_config::{Path, decode_path};
use confmelt_core::{EditSession, EditorConfig};

/// Open an edit session, naming the directory on failure.
pub(crate) fn open_session(config: EditorConfig) -> Result<EditSession> {
    let dir = config.config_dir.display().to_string();
    EditSession::open(config).with_context(|| format!("Failed to load configuration from {dir}"))
}

/// Decode path segments given on the command line.
pub(crate) fn parse_path(segments: &[String]) -> Result<Path> {
    decode_path(segments).context("Invalid path")
}
