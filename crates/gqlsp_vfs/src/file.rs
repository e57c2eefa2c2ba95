//! File and document identities.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identity of a source file.
///
/// Synthetic files are in-memory scratch buffers that have no durable
/// counterpart; they are never written back to storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRef {
    path: Arc<Path>,
    synthetic: bool,
}

impl FileRef {
    /// Creates a reference to a file on durable storage.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into()),
            synthetic: false,
        }
    }

    /// Creates a reference to an in-memory scratch file.
    pub fn synthetic(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into()),
            synthetic: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the final path segment, if it is valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for FileRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FileRef {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// Identity of an open in-memory document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}
