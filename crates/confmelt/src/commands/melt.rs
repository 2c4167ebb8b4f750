//! Melt command implementation.
//!
//! Prints one line per leaf, in document order:
//!
//! ```text
//! server/hosts/-LIST-: 0	alpha	string
//! ```
//!
//! With `--json`, each line is a JSON object with the encoded `path`,
//! `leaf_key`, `value` and `declared_type`.

use std::io::{self, Write};

use anyhow::{Context, Result};
use confmelt_config::{LeafRecord, join_path};
use confmelt_core::EditorConfig;

use super::open_session;

/// Execute the melt command
pub fn execute(config: EditorConfig, json: bool) -> Result<()> {
    let session = open_session(config)?;
    let records = session.melt()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        let line = if json {
            serde_json::to_string(record).context("Failed to serialize leaf record")?
        } else {
            format_record(record)
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn format_record(record: &LeafRecord) -> String {
    format!(
        "{}\t{}\t{}",
        join_path(&record.full_path()),
        record.value,
        record.declared_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmelt_config::{ConfigDocument, Node};

    #[test]
    fn test_format_record() {
        let mut doc = ConfigDocument::new();
        doc.insert_section(
            "server",
            Node::from_entries([("hosts", Node::from_items([Node::from("alpha")]))]),
        );
        let records = doc.melt().unwrap();
        assert_eq!(
            format_record(&records[0]),
            "server/hosts/-LIST-: 0\talpha\tstring"
        );
    }

    #[test]
    fn test_json_record() {
        let mut doc = ConfigDocument::new();
        doc.insert_section("s", Node::from_entries([("ratio", Node::from(0.5))]));
        let records = doc.melt().unwrap();
        assert_eq!(
            serde_json::to_string(&records[0]).unwrap(),
            r#"{"path":["s"],"leaf_key":"ratio","value":0.5,"declared_type":"float"}"#
        );
    }
}
