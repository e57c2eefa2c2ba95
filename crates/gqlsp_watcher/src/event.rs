//! Change events delivered to the watcher.

use gqlsp_vfs::{DocumentId, FileRef};

/// A file property whose change is reported separately from content changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileProperty {
    /// The file was renamed in place.
    Name,
    Writable,
    Encoding,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEventKind {
    Create,
    Delete,
    ContentChange,
    Move,
    Copy,
    PropertyChange {
        property: FileProperty,
        old_value: Option<String>,
        new_value: Option<String>,
    },
}

/// One entry of a bulk file-system change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Affected file; absent when the transport could not resolve it.
    pub file: Option<FileRef>,
    pub is_directory: bool,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(file: FileRef, kind: FileEventKind) -> Self {
        Self {
            file: Some(file),
            is_directory: false,
            kind,
        }
    }

    pub fn directory(dir: FileRef, kind: FileEventKind) -> Self {
        Self {
            file: Some(dir),
            is_directory: true,
            kind,
        }
    }

    /// A rename of `file` from `old_name` to `new_name`.
    pub fn renamed(file: FileRef, old_name: &str, new_name: &str) -> Self {
        Self::new(
            file,
            FileEventKind::PropertyChange {
                property: FileProperty::Name,
                old_value: Some(old_name.to_string()),
                new_value: Some(new_name.to_string()),
            },
        )
    }

    /// Returns whether the event changes which files exist or what they are
    /// called.
    pub fn is_structural(&self) -> bool {
        match &self.kind {
            FileEventKind::Create
            | FileEventKind::Delete
            | FileEventKind::Move
            | FileEventKind::Copy => true,
            FileEventKind::PropertyChange { property, .. } => *property == FileProperty::Name,
            FileEventKind::ContentChange => false,
        }
    }
}

/// A live edit of an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEvent {
    pub document: DocumentId,
}
