//! Get command implementation.

use anyhow::{Context, Result};
use confmelt_config::Node;
use confmelt_core::EditorConfig;

use super::{open_session, parse_path};

/// Execute the get command
pub fn execute(config: EditorConfig, segments: &[String]) -> Result<()> {
    let path = parse_path(segments)?;
    let session = open_session(config)?;
    let node = session.get(&path)?;
    print!("{}", render_node(node)?);
    Ok(())
}

/// Scalars print as their plain value, containers as YAML.
fn render_node(node: &Node) -> Result<String> {
    match node {
        Node::Scalar(value) => Ok(format!("{value}\n")),
        container => confmelt_yaml::emit(container).context("Failed to render sub-tree"),
    }
}
