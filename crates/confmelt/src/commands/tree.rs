//! Tree command implementation.

use anyhow::Result;
use confmelt_config::{DisplayKind, DisplayNode};
use confmelt_core::EditorConfig;

use super::open_session;

/// Execute the tree command
pub fn execute(config: EditorConfig) -> Result<()> {
    let session = open_session(config)?;
    print!("{}", render_tree(&session.project()?));
    Ok(())
}

/// Indented rendering of a projected hierarchy, two spaces per level.
pub fn render_tree(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        let indent = "  ".repeat(node.depth().saturating_sub(1));
        match &node.kind {
            DisplayKind::Branch => {
                out.push_str(&format!("{indent}{}\n", node.label()));
            }
            DisplayKind::Leaf {
                value,
                declared_type,
            } => {
                out.push_str(&format!(
                    "{indent}{}: {value} ({declared_type})\n",
                    node.label()
                ));
            }
        }
    }
    out
}
