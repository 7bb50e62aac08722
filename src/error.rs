//! Errors surfaced by the differ and by the file glue around it.

use std::fmt;
use std::path::PathBuf;

use crate::Type;

/// Which of the two compared documents a condition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Sample,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => f.write_str("reference"),
            Side::Sample => f.write_str("sample"),
        }
    }
}

/// Errors that can occur during a comparison.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A document root is not a JSON object.
    #[error("{side} document root must be a JSON object, got {found}")]
    MissingInput { side: Side, found: Type },

    /// A key holds an object on one side and a non-object on the other, and
    /// the differ was configured to reject that.
    #[error("type mismatch at `{path}`: {reference} in reference, {sample} in sample")]
    TypeMismatch {
        path: String,
        reference: Type,
        sample: Type,
    },
}

/// Convenience alias for comparison results.
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors reading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required file path setting is absent or blank.
    #[error("setting `FilePaths:{0}` is missing or empty")]
    MissingPath(&'static str),
}

/// Errors loading a JSON document from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
}
