//! Error types for confmelt-core

use std::path::PathBuf;

use confmelt_config::{EditError, MeltError, PathError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config directory not found: {}", .0.display())]
    ConfigDirNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: confmelt_yaml::Error,
    },

    #[error("Failed to serialize section {section:?}: {source}")]
    Serialize {
        section: String,
        #[source]
        source: confmelt_yaml::Error,
    },

    #[error("Failed to scan config directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("No default configuration is loaded")]
    NoDefault,

    #[error("Unknown running environment {0:?} (expected DEV, NON_PROD or PROD)")]
    UnknownEnv(String),

    #[error(transparent)]
    Melt(#[from] MeltError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Error::Edit(EditError::Path(err))
    }
}

impl Error {
    /// True when the error came from user input rather than from the
    /// documents or the filesystem.
    pub fn is_user_error(&self) -> bool {
        match self {
            Error::Edit(err) => err.is_user_error(),
            Error::UnknownEnv(_) | Error::NoDefault => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
