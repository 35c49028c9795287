//! Error types for the ecotick_io crate.
//!
//! Everything that can go wrong between an [`EngineSnapshot`] in memory and
//! bytes on disk: file access, gzip, JSON, and the checks a save envelope must
//! pass before it is trusted.
//!
//! [`EngineSnapshot`]: ecotick_core::snapshot::EngineSnapshot

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// A value could not be turned into JSON or back.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File access failed. `path` is empty for errors raised without one.
    #[error("Cannot access {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Gzip error in {path:?}: {message}")]
    Gzip { path: PathBuf, message: String },

    /// Input that parsed but makes no sense.
    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error("Unknown save format '{0}'")]
    UnknownFormat(String),

    #[error("Checksum mismatch: expected {expected}, found {found}")]
    Checksum { expected: String, found: String },
}

impl From<std::io::Error> for IoError {
    fn from(source: std::io::Error) -> Self {
        Self::File {
            path: PathBuf::new(),
            source,
        }
    }
}

/// Result type alias for ecotick_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }

    #[must_use]
    pub fn file(path: &Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn gzip(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Gzip {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// True for a file that does not exist, as opposed to one that is broken.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::File { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// True when the stored data was readable but failed an integrity check.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Json(_)
                | Self::Gzip { .. }
                | Self::Invalid(_)
                | Self::UnknownFormat(_)
                | Self::Checksum { .. }
        )
    }
}
