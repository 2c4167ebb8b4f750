//! Error types for YAML reading and writing.

use std::fmt;

use thiserror::Error;
use yaml_rust2::scanner::Marker;

/// Result type alias for confmelt-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Position in the YAML source, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub(crate) fn from_marker(marker: &Marker) -> Self {
        Self {
            line: marker.line(),
            column: marker.col() + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur while reading or writing YAML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error
    #[error("Parse error: {message}{}", at(location))]
    ParseError {
        message: String,
        location: Option<Location>,
    },

    /// Valid YAML that has no `Node` equivalent
    #[error("Invalid YAML structure: {message}{}", at(location))]
    InvalidStructure {
        message: String,
        location: Option<Location>,
    },

    #[error("Failed to write YAML: {0}")]
    EmitError(String),
}

fn at(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::ParseError {
            message: err.info().to_string(),
            location: Some(Location::from_marker(err.marker())),
        }
    }
}
