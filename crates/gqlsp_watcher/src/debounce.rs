//! Debounced write-back bookkeeping.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use gqlsp_vfs::{DocumentId, FileRef};
use parking_lot::Mutex;

/// Default flush delay in milliseconds.
pub const DEFAULT_FLUSH_DEBOUNCE_MS: u64 = 3000;

/// A configuration file with unsaved in-memory edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchedEdit {
    pub file: FileRef,
    pub document: DocumentId,
}

/// Pending edits plus the "flush timer armed" flag.
///
/// The timer is armed at most once per window, so the flush latency is
/// bounded from the first edit instead of being pushed back by later ones.
#[derive(Debug, Default)]
pub struct FlushQueue {
    pending: Mutex<HashSet<WatchedEdit>>,
    armed: AtomicBool,
}

impl FlushQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit. Returns `false` if it was already pending.
    pub fn push(&self, edit: WatchedEdit) -> bool {
        self.pending.lock().insert(edit)
    }

    /// Arms the timer. Returns `true` only for the caller that armed it.
    pub fn try_arm(&self) -> bool {
        self.armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Takes every pending edit, leaving the set empty.
    ///
    /// Edits pushed afterwards stay pending for the next window.
    pub fn take_pending(&self) -> Vec<WatchedEdit> {
        let mut batch: Vec<_> = std::mem::take(&mut *self.pending.lock())
            .into_iter()
            .collect();
        batch.sort_by(|a, b| a.file.cmp(&b.file).then(a.document.cmp(&b.document)));
        batch
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
