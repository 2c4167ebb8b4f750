//! Resolve command implementation.
//!
//! Merges `INDEP_ENV` and `DEP_ENV.<env>` of every file and prints the
//! result.

use anyhow::{Context, Result};
use confmelt_config::Node;
use confmelt_core::{EditorConfig, EnvLoader, RunningEnv, SectionLoader};

/// Execute the resolve command
pub fn execute(config: EditorConfig, env: RunningEnv, json: bool) -> Result<()> {
    let mut sections = SectionLoader::new(&config.config_dir);
    if let Some(names) = config.file_names {
        sections = sections.with_files(names);
    }

    let merged = EnvLoader::new(sections, env)
        .load()
        .with_context(|| format!("Failed to resolve configuration for {env}"))?;
    let node = Node::Map(merged);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&node).context("Failed to serialize configuration")?
        );
    } else {
        print!(
            "{}",
            confmelt_yaml::emit(&node).context("Failed to serialize configuration")?
        );
    }
    Ok(())
}
