/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reading and writing per-section configuration files.
 */

//! Reading and writing per-section configuration files.
//!
//! A configuration directory holds one YAML file per section. The section
//! name is the file name up to its first `.`, so `database.yaml` and
//! `database.local.yaml` both feed the `database` section.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use confmelt_config::{ConfigDocument, Node};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extension of the files discovered in a configuration directory.
pub const CONFIG_EXTENSION: &str = "yaml";

/// Loads the sections of one configuration directory.
#[derive(Debug, Clone)]
pub struct SectionLoader {
    config_dir: PathBuf,

    /// Explicit file names, read in this order. `None` means every
    /// `*.yaml` file directly inside `config_dir`.
    file_names: Option<Vec<String>>,
}

impl SectionLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            file_names: None,
        }
    }

    /// Restrict loading to the given files.
    pub fn with_files(mut self, file_names: Vec<String>) -> Self {
        self.file_names = Some(file_names);
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// The files this loader reads, in load order.
    ///
    /// Discovered files are sorted by name so that load order does not
    /// depend on the filesystem.
    pub fn file_names(&self) -> Result<Vec<String>> {
        if !self.config_dir.is_dir() {
            return Err(Error::ConfigDirNotFound(self.config_dir.clone()));
        }
        if let Some(names) = &self.file_names {
            return Ok(names.clone());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.config_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|ext| ext != CONFIG_EXTENSION)
            {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if name.starts_with('.') => {
                    debug!(file = %path.display(), "Skipping hidden file");
                }
                Some(name) => names.push(name.to_string()),
                None => warn!(file = %path.display(), "Skipping file with a non UTF-8 name"),
            }
        }
        Ok(names)
    }

    /// Load every file into a document, one section per file.
    pub fn load(&self) -> Result<ConfigDocument> {
        let mut document = ConfigDocument::new();
        for file_name in self.file_names()? {
            let section = section_name(&file_name);
            let node = read_section(&self.config_dir.join(&file_name))?;
            if document.insert_section(section, node).is_some() {
                warn!(section, file = %file_name, "Section loaded twice; keeping the later file");
            }
        }
        debug!(
            dir = %self.config_dir.display(),
            sections = document.len(),
            "Loaded configuration directory"
        );
        Ok(document)
    }

    /// Load every file as a raw tree, keyed by file name, in load order.
    pub(crate) fn load_files(&self) -> Result<Vec<(String, Node)>> {
        self.file_names()?
            .into_iter()
            .map(|file_name| {
                let node = read_section(&self.config_dir.join(&file_name))?;
                Ok((file_name, node))
            })
            .collect()
    }
}

/// Section name for a file name: everything before the first `.`.
pub fn section_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Read and parse one section file.
pub fn read_section(path: &Path) -> Result<Node> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let node = confmelt_yaml::parse(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(file = %path.display(), leaves = node.leaf_count(), "Read section file");
    Ok(node)
}

/// Write one section to `output_dir/<name>.yaml`, creating the directory.
pub fn save_section(name: &str, section: &Node, output_dir: &Path) -> Result<PathBuf> {
    let text = confmelt_yaml::emit(section).map_err(|source| Error::Serialize {
        section: name.to_string(),
        source,
    })?;

    fs::create_dir_all(output_dir).map_err(|source| Error::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(format!("{name}.{CONFIG_EXTENSION}"));
    fs::write(&path, text).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    debug!(file = %path.display(), "Wrote section file");
    Ok(path)
}

/// Write every section of a document, in document order.
pub fn save_document(document: &ConfigDocument, output_dir: &Path) -> Result<Vec<PathBuf>> {
    document
        .sections()
        .map(|(name, section)| save_section(name, section, output_dir))
        .collect()
}

/// Remove `output_dir/<name>.yaml` if it exists.
///
/// Returns the removed path, or `None` when there was no such file.
pub fn remove_section(name: &str, output_dir: &Path) -> Result<Option<PathBuf>> {
    let path = output_dir.join(format!("{name}.{CONFIG_EXTENSION}"));
    match fs::remove_file(&path) {
        Ok(()) => {
            debug!(file = %path.display(), "Removed section file");
            Ok(Some(path))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Remove { path, source }),
    }
}
