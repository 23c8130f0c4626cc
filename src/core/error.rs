//! Errors that fail a curation.

use std::path::PathBuf;

use thiserror::Error;

/// Why a URL could not be curated.
///
/// Image download failures never appear here; they are only counted.
#[derive(Debug, Error)]
pub enum CurationError {
    /// Credentials are missing or unusable; nothing can be fetched
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Fetch(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to update cache: {0}")]
    Cache(String),
}

impl CurationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
