//! In-memory documents and their write-back to storage.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use gqlsp_vfs::{DocumentId, FileRef};
use parking_lot::RwLock;
use tracing::debug;

use crate::StorageError;

/// Open documents the watcher can write back.
pub trait DocumentStore: Send + Sync {
    /// Returns the file backing `document`, if it is open.
    fn file_of(&self, document: DocumentId) -> Option<FileRef>;

    /// Writes the in-memory content of `document` to its file.
    ///
    /// Returns `Ok(false)` when there was nothing to write.
    fn save_document(&self, document: DocumentId) -> Result<bool, StorageError>;
}

#[derive(Debug)]
struct Buffer {
    file: FileRef,
    text: String,
    version: u64,
    saved_version: u64,
}

/// A [`DocumentStore`] backed by files on the local file system.
#[derive(Default)]
pub struct FsDocumentStore {
    next_id: AtomicU64,
    buffers: RwLock<HashMap<DocumentId, Buffer>>,
}

impl FsDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `file`, loading its current content.
    ///
    /// Synthetic files start out empty.
    pub fn open(&self, file: FileRef) -> Result<DocumentId, StorageError> {
        let text = if file.is_synthetic() {
            String::new()
        } else {
            std::fs::read_to_string(file.path())
                .map_err(|e| StorageError::io(file.path(), e))?
        };

        let id = DocumentId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        debug!("Document opened: {} as {}", file, id);
        self.buffers.write().insert(
            id,
            Buffer {
                file,
                text,
                version: 0,
                saved_version: 0,
            },
        );
        Ok(id)
    }

    /// Replaces the content of `document` and returns its new version.
    pub fn edit(&self, document: DocumentId, text: impl Into<String>) -> Result<u64, StorageError> {
        let mut buffers = self.buffers.write();
        let buffer = buffers
            .get_mut(&document)
            .ok_or(StorageError::UnknownDocument(document))?;
        buffer.text = text.into();
        buffer.version += 1;
        Ok(buffer.version)
    }

    pub fn text(&self, document: DocumentId) -> Option<String> {
        self.buffers.read().get(&document).map(|b| b.text.clone())
    }

    /// Returns whether `document` has edits that were not written yet.
    pub fn is_dirty(&self, document: DocumentId) -> bool {
        self.buffers
            .read()
            .get(&document)
            .is_some_and(|b| b.version != b.saved_version)
    }

    /// Closes `document`, discarding unsaved edits.
    pub fn close(&self, document: DocumentId) -> bool {
        self.buffers.write().remove(&document).is_some()
    }
}

impl DocumentStore for FsDocumentStore {
    fn file_of(&self, document: DocumentId) -> Option<FileRef> {
        self.buffers.read().get(&document).map(|b| b.file.clone())
    }

    fn save_document(&self, document: DocumentId) -> Result<bool, StorageError> {
        let (file, text, version) = {
            let buffers = self.buffers.read();
            let buffer = buffers
                .get(&document)
                .ok_or(StorageError::UnknownDocument(document))?;
            if buffer.version == buffer.saved_version || buffer.file.is_synthetic() {
                return Ok(false);
            }
            (buffer.file.clone(), buffer.text.clone(), buffer.version)
        };

        std::fs::write(file.path(), text).map_err(|e| StorageError::io(file.path(), e))?;

        if let Some(buffer) = self.buffers.write().get_mut(&document) {
            buffer.saved_version = buffer.saved_version.max(version);
        }
        debug!("Document saved: {} (version {})", file, version);
        Ok(true)
    }
}

impl fmt::Debug for FsDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsDocumentStore")
            .field("open_documents", &self.buffers.read().len())
            .finish()
    }
}
