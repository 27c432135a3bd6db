use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the configuration store and its reader/writer.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A section name or section pattern matched nothing.
    #[error("unable to find {name}")]
    NotFound { name: String },

    /// The pattern given to a section query is not a valid regular expression.
    #[error("invalid section pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read configuration from {}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renaming the backup, creating the file or writing/flushing it failed.
    /// Carries the first error encountered.
    #[error("failed to write configuration to {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration has no file path to save to")]
    NoFilePath,
}

impl Error {
    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
