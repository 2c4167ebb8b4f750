//! Delete command implementation.

use anyhow::Result;
use confmelt_config::join_path;
use confmelt_core::EditorConfig;

use super::{open_session, parse_path};

/// Execute the delete command
pub fn execute(config: EditorConfig, segments: &[String]) -> Result<()> {
    let path = parse_path(segments)?;
    let mut session = open_session(config)?;

    let removed = session.delete(&path)?;
    session.save()?;

    println!(
        "Deleted {} ({} leaves)",
        join_path(&path),
        removed.leaf_count()
    );
    Ok(())
}
