//! Reset command implementation.

use anyhow::{Context, Result};
use confmelt_core::EditorConfig;

use super::open_session;

/// Execute the reset command
pub fn execute(config: EditorConfig) -> Result<()> {
    let mut session = open_session(config)?;
    session
        .load_default()
        .context("Pass --default-dir to reset to a default configuration")?;

    let written = session.save()?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
