//! Environment-layered configuration.
//!
//! A layered file carries two top-level keys:
//!
//! ```yaml
//! INDEP_ENV:          # applies in every environment
//!   db: {host: localhost, port: 5432}
//! DEP_ENV:
//!   PROD:             # applies only when running in PROD
//!     db: {host: db.internal}
//! ```
//!
//! Resolving a file deep-merges `INDEP_ENV` and then `DEP_ENV.<env>` into an
//! empty map. Resolving a directory merges the resolved files in load order.

use std::fmt;
use std::str::FromStr;

use confmelt_config::Node;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::loader::SectionLoader;

/// Key holding settings shared by every environment.
pub const INDEP_ENV_KEY: &str = "INDEP_ENV";

/// Key holding per-environment settings, keyed by environment name.
pub const DEP_ENV_KEY: &str = "DEP_ENV";

/// The environment a layered configuration is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunningEnv {
    #[default]
    Dev,
    NonProd,
    Prod,
}

impl RunningEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunningEnv::Dev => "DEV",
            RunningEnv::NonProd => "NON_PROD",
            RunningEnv::Prod => "PROD",
        }
    }
}

impl fmt::Display for RunningEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunningEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEV" => Ok(RunningEnv::Dev),
            "NON_PROD" => Ok(RunningEnv::NonProd),
            "PROD" => Ok(RunningEnv::Prod),
            _ => Err(Error::UnknownEnv(s.to_string())),
        }
    }
}

/// Loads a configuration directory and resolves it for one environment.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    sections: SectionLoader,
    env: RunningEnv,
}

impl EnvLoader {
    pub fn new(sections: SectionLoader, env: RunningEnv) -> Self {
        Self { sections, env }
    }

    pub fn env(&self) -> RunningEnv {
        self.env
    }

    /// Resolve every file and merge the results in load order.
    pub fn load(&self) -> Result<IndexMap<String, Node>> {
        let mut merged = IndexMap::new();
        for (file_name, file) in self.sections.load_files()? {
            let resolved = resolve_env(&file, self.env);
            debug!(file = %file_name, env = %self.env, keys = resolved.len(), "Resolved layered file");
            deep_update(&mut merged, &resolved);
        }
        Ok(merged)
    }
}

/// Resolve one layered file for `env`.
///
/// Missing layers count as empty. A layer that is present but is not a map
/// is skipped with a warning.
pub fn resolve_env(file: &Node, env: RunningEnv) -> IndexMap<String, Node> {
    let mut resolved = IndexMap::new();

    if let Some(indep) = layer(file.get_key(INDEP_ENV_KEY), INDEP_ENV_KEY) {
        deep_update(&mut resolved, indep);
    }

    let dep = file
        .get_key(DEP_ENV_KEY)
        .and_then(|by_env| by_env.get_key(env.as_str()));
    if let Some(dep) = layer(dep, env.as_str()) {
        deep_update(&mut resolved, dep);
    }

    resolved
}

fn layer<'a>(node: Option<&'a Node>, name: &str) -> Option<&'a IndexMap<String, Node>> {
    match node? {
        Node::Map(entries) => Some(entries),
        // `KEY:` with nothing under it
        Node::Scalar(scalar) if scalar.is_null() => None,
        other => {
            warn!(layer = name, found = other.kind_name(), "Ignoring configuration layer that is not a map");
            None
        }
    }
}

/// Merge `overrides` into `target`.
///
/// A non-empty map override is merged key by key, recursively; if the target
/// value is not a map it is replaced by one first. Every other override
/// (scalars, sequences, empty maps) replaces the target value. New keys are
/// appended, existing keys keep their position.
pub fn deep_update(target: &mut IndexMap<String, Node>, overrides: &IndexMap<String, Node>) {
    for (key, value) in overrides {
        match value {
            Node::Map(nested) if !nested.is_empty() => {
                let slot = target.entry(key.clone()).or_insert_with(Node::map);
                if !slot.is_map() {
                    *slot = Node::map();
                }
                if let Node::Map(slot_entries) = slot {
                    deep_update(slot_entries, nested);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}
