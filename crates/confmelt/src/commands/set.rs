/*
 * set.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Set command implementation
 */

//! Set command implementation.
//!
//! The value is coerced to the requested type, or to the type the leaf
//! already has, before anything is written. Input that does not parse
//! leaves both the document and the files untouched. A null leaf has no
//! type to keep, so setting it to a non-empty value needs `--type`.

use anyhow::{Result, bail};
use confmelt_config::{ScalarType, join_path};
use confmelt_core::EditorConfig;
use tracing::info;

use super::{open_session, parse_path};

/// Arguments for the set command
#[derive(Debug)]
pub struct SetArgs {
    /// Encoded path segments
    pub path: Vec<String>,
    /// New value as text
    pub value: String,
    /// Type to coerce to; `None` keeps the leaf's current type
    pub ty: Option<ScalarType>,
}

/// Execute the set command
pub fn execute(config: EditorConfig, args: SetArgs) -> Result<()> {
    let path = parse_path(&args.path)?;
    let mut session = open_session(config)?;

    let declared = match args.ty {
        Some(ty) => ty,
        None => session.document().get_scalar(&path)?.declared_type(),
    };
    // A null leaf would discard whatever was typed.
    if args.ty.is_none() && declared == ScalarType::Null && !args.value.is_empty() {
        bail!(
            "{} is null; pass --type to choose the type of {:?}",
            join_path(&path),
            args.value
        );
    }

    let stored = session.edit(&path, &args.value, declared)?;
    let written = session.save()?;
    info!(files = written.len(), "Saved after edit");

    println!("{} = {stored} ({declared})", join_path(&path));
    Ok(())
}
