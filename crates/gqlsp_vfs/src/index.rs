//! File system queries used by the caches and the change watcher.

use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::FileRef;

/// Validity, membership and modification queries for files.
pub trait FileIndex: Send + Sync {
    /// Returns whether the file still exists.
    fn is_valid(&self, file: &FileRef) -> bool;

    fn is_directory(&self, file: &FileRef) -> bool;

    /// Returns whether the file belongs to the project content.
    fn is_in_project(&self, file: &FileRef) -> bool;

    /// Returns a stamp that changes whenever the file is modified.
    fn modification_stamp(&self, file: &FileRef) -> u64;
}

/// A [`FileIndex`] backed by the local file system.
///
/// Synthetic files are always valid and never change stamp.
#[derive(Debug, Clone)]
pub struct OsFileIndex {
    project_root: PathBuf,
}

impl OsFileIndex {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl FileIndex for OsFileIndex {
    fn is_valid(&self, file: &FileRef) -> bool {
        file.is_synthetic() || file.path().exists()
    }

    fn is_directory(&self, file: &FileRef) -> bool {
        !file.is_synthetic() && file.path().is_dir()
    }

    fn is_in_project(&self, file: &FileRef) -> bool {
        file.path().starts_with(&self.project_root)
    }

    fn modification_stamp(&self, file: &FileRef) -> u64 {
        if file.is_synthetic() {
            return 0;
        }
        fs::metadata(file.path())
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}
