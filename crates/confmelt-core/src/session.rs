/*
 * session.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Edit session over a loaded configuration directory.
 */

//! Edit session over a loaded configuration directory.
//!
//! A session holds three documents:
//!
//! - `original`: what was loaded, never mutated
//! - `default`: an optional reference configuration, never mutated
//! - `edited`: a deep copy of `original`, the only document edits touch
//!
//! "Undo all" and "load default" replace `edited` wholesale with a fresh copy
//! of one of the other two. Saving writes `edited` back to disk one file per
//! section and leaves it as it is in memory.

use std::path::{Path, PathBuf};

use confmelt_config::{
    ConfigDocument, DisplayNode, EditError, LeafRecord, Node, PathError, PathSegment, Scalar,
    ScalarType, join_path, project_document,
};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::loader::{SectionLoader, remove_section, save_document};

/// Where an edit session reads from and writes to.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub config_dir: PathBuf,

    /// Files to load; `None` loads every `*.yaml` file in `config_dir`.
    pub file_names: Option<Vec<String>>,

    /// Where `save` writes. Defaults to `config_dir`.
    pub output_dir: Option<PathBuf>,

    /// Directory holding the default configuration, if any.
    pub default_dir: Option<PathBuf>,
}

impl EditorConfig {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            file_names: None,
            output_dir: None,
            default_dir: None,
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(self.config_dir.as_path())
    }

    fn loader(&self, dir: &Path) -> SectionLoader {
        let loader = SectionLoader::new(dir);
        match &self.file_names {
            Some(names) => loader.with_files(names.clone()),
            None => loader,
        }
    }
}

pub struct EditSession {
    config: EditorConfig,
    original: ConfigDocument,
    default: Option<ConfigDocument>,
    edited: ConfigDocument,
    dirty: bool,
}

impl EditSession {
    /// Load the configuration (and the default, if configured).
    pub fn open(config: EditorConfig) -> Result<Self> {
        let original = config.loader(&config.config_dir).load()?;
        let default = match &config.default_dir {
            Some(dir) => Some(config.loader(dir).load()?),
            None => None,
        };

        info!(
            dir = %config.config_dir.display(),
            sections = original.len(),
            has_default = default.is_some(),
            "Opened edit session"
        );
        Ok(Self::from_documents(config, original, default))
    }

    /// Start a session from documents that are already in memory.
    pub fn from_documents(
        config: EditorConfig,
        original: ConfigDocument,
        default: Option<ConfigDocument>,
    ) -> Self {
        let edited = original.clone();
        Self {
            config,
            original,
            default,
            edited,
            dirty: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The edited document.
    pub fn document(&self) -> &ConfigDocument {
        &self.edited
    }

    pub fn original(&self) -> &ConfigDocument {
        &self.original
    }

    pub fn default_document(&self) -> Option<&ConfigDocument> {
        self.default.as_ref()
    }

    pub fn melt(&self) -> Result<Vec<LeafRecord>> {
        Ok(self.edited.melt()?)
    }

    pub fn project(&self) -> Result<Vec<DisplayNode>> {
        Ok(project_document(&self.edited)?)
    }

    pub fn get(&self, path: &[PathSegment]) -> Result<&Node> {
        self.edited.get(path).map_err(|err| path_failure(path, err))
    }

    /// Coerce `text` to `declared` and store it at `path`.
    ///
    /// Rejected input leaves the document unchanged.
    pub fn edit(&mut self, path: &[PathSegment], text: &str, declared: ScalarType) -> Result<Scalar> {
        match self.edited.set_text(path, text, declared) {
            Ok(value) => {
                self.dirty = true;
                info!(path = %join_path(path), value = %value, ty = %declared, "Edited value");
                Ok(value)
            }
            Err(EditError::Coercion(err)) => {
                debug!(path = %join_path(path), input = %err.input, "Rejected input: {err}");
                Err(EditError::Coercion(err).into())
            }
            Err(EditError::Path(err)) => Err(path_failure(path, err)),
        }
    }

    /// Replace the node at `path` with `value`.
    pub fn replace(&mut self, path: &[PathSegment], value: Node) -> Result<()> {
        self.edited
            .set(path, value)
            .map_err(|err| path_failure(path, err))?;
        self.dirty = true;
        info!(path = %join_path(path), "Replaced node");
        Ok(())
    }

    /// Remove the node at `path` and return it.
    pub fn delete(&mut self, path: &[PathSegment]) -> Result<Node> {
        let removed = self
            .edited
            .delete(path)
            .map_err(|err| path_failure(path, err))?;
        self.dirty = true;
        info!(path = %join_path(path), "Deleted node");
        Ok(removed)
    }

    /// Discard every edit since the session was opened.
    pub fn undo_all(&mut self) {
        self.edited = self.original.clone();
        self.dirty = false;
        info!("Discarded all edits");
    }

    /// Replace the edited document with the default configuration.
    pub fn load_default(&mut self) -> Result<()> {
        let default = self.default.as_ref().ok_or(Error::NoDefault)?;
        self.edited = default.clone();
        self.dirty = true;
        info!("Loaded default configuration");
        Ok(())
    }

    /// Write every section of the edited document to the output directory.
    ///
    /// Files of sections that were loaded but are no longer in the edited
    /// document are removed, so they do not come back on the next load.
    pub fn save(&mut self) -> Result<Vec<PathBuf>> {
        let output_dir = self.config.output_dir();
        let written = save_document(&self.edited, output_dir)?;
        for name in self.removed_sections() {
            if let Some(path) = remove_section(name, output_dir)? {
                info!(section = name, file = %path.display(), "Removed deleted section");
            }
        }
        self.dirty = false;
        info!(
            dir = %self.config.output_dir().display(),
            files = written.len(),
            "Saved configuration"
        );
        Ok(written)
    }

    /// Whether there are edits that have not been saved or undone.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether `undo_all` has anything to discard.
    ///
    /// This follows the dirty flag: after a save there is nothing to undo
    /// even though the document still differs from the one first loaded.
    pub fn can_undo(&self) -> bool {
        self.dirty
    }

    /// Sections of the loaded document that the edited document no longer has.
    pub fn removed_sections(&self) -> Vec<&str> {
        self.original
            .sections()
            .map(|(name, _)| name)
            .filter(|name| self.edited.section(name).is_none())
            .collect()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Paths reach the session from melt output, so a miss means the caller's
/// view of the document is stale.
fn path_failure(path: &[PathSegment], err: PathError) -> Error {
    error!(path = %join_path(path), "Path does not resolve: {err}");
    Error::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> PathSegment {
        PathSegment::key(k)
    }

    fn session() -> EditSession {
        let mut original = ConfigDocument::new();
        original.insert_section(
            "server",
            Node::from_entries([("port", Node::from(8080)), ("debug", Node::from(false))]),
        );
        let mut default = ConfigDocument::new();
        default.insert_section("server", Node::from_entries([("port", Node::from(80))]));

        EditSession::from_documents(EditorConfig::new("."), original, Some(default))
    }

    #[test]
    fn test_edit_marks_dirty_and_undo_restores() {
        let mut session = session();
        assert!(!session.is_dirty());

        let port = [key("server"), key("port")];
        let stored = session.edit(&port, "9090", ScalarType::Integer).unwrap();
        assert_eq!(stored, Scalar::Integer(9090));
        assert!(session.is_dirty());
        assert!(session.can_undo());
        assert_eq!(session.original().get_scalar(&port).unwrap(), &Scalar::Integer(8080));

        session.undo_all();
        assert!(!session.is_dirty());
        assert_eq!(session.document(), session.original());
    }

    #[test]
    fn test_rejected_edit_is_a_user_error() {
        let mut session = session();
        let port = [key("server"), key("port")];

        let err = session.edit(&port, "12x", ScalarType::Integer).unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Value must be integer number.");
        assert!(!session.is_dirty());
        assert_eq!(session.get(&port).unwrap(), &Node::from(8080));
    }

    #[test]
    fn test_stale_path_is_not_a_user_error() {
        let mut session = session();
        let err = session
            .edit(&[key("server"), key("host")], "x", ScalarType::String)
            .unwrap_err();
        assert!(!err.is_user_error());
        assert!(matches!(err, Error::Edit(EditError::Path(PathError::KeyNotFound { .. }))));
    }

    #[test]
    fn test_delete_marks_dirty() {
        let mut session = session();
        let removed = session.delete(&[key("server"), key("debug")]).unwrap();
        assert_eq!(removed, Node::from(false));
        assert!(session.is_dirty());
        assert_eq!(session.melt().unwrap().len(), 1);
    }

    #[test]
    fn test_removed_sections() {
        let mut session = session();
        assert!(session.removed_sections().is_empty());

        session.delete(&[key("server")]).unwrap();
        assert_eq!(session.removed_sections(), vec!["server"]);

        session.undo_all();
        assert!(session.removed_sections().is_empty());
    }

    #[test]
    fn test_load_default() {
        let mut session = session();
        session.load_default().unwrap();
        assert!(session.is_dirty());
        assert_eq!(
            session.document().get_scalar(&[key("server"), key("port")]).unwrap(),
            &Scalar::Integer(80)
        );

        let mut bare = EditSession::from_documents(EditorConfig::new("."), ConfigDocument::new(), None);
        assert!(matches!(bare.load_default(), Err(Error::NoDefault)));
    }

    #[test]
    fn test_project_includes_section_branch() {
        let rows = session().project().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].branch, vec![key("server")]);
        assert!(!rows[0].is_leaf());
    }

    #[test]
    fn test_output_dir_defaults_to_config_dir() {
        let mut config = EditorConfig::new("conf");
        assert_eq!(config.output_dir(), Path::new("conf"));
        config.output_dir = Some(PathBuf::from("out"));
        assert_eq!(config.output_dir(), Path::new("out"));
    }
}
