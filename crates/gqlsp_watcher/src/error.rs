//! Storage error types.

use std::path::PathBuf;

use gqlsp_vfs::DocumentId;
use thiserror::Error;

/// Failure while writing a document back to storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document is not (or no longer) open.
    #[error("Unknown document: {0}")]
    UnknownDocument(DocumentId),

    /// Reading or writing the backing file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
