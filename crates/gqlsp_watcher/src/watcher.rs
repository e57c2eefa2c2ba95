//! Change watcher: reload scheduling and debounced configuration write-back.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use gqlsp_memo::Generation;
use gqlsp_scope::ConfigResolver;
use gqlsp_vfs::FileIndex;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    ConfigFileNames, DEFAULT_FLUSH_DEBOUNCE_MS, DocumentEvent, DocumentStore, FileEvent,
    FlushQueue, MainExecutor, WatchedEdit, configurations_changed,
};

/// Tunables for [`ChangeWatcher`].
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    pub config_file_names: ConfigFileNames,
    /// Delay between the first unsaved edit and the write-back.
    pub flush_debounce: Duration,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            config_file_names: ConfigFileNames::default(),
            flush_debounce: Duration::from_millis(DEFAULT_FLUSH_DEBOUNCE_MS),
        }
    }
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Documents written to storage.
    pub saved: usize,
    /// Documents that had nothing to write.
    pub unchanged: usize,
    /// Edits dropped because their file is no longer valid.
    pub dropped: usize,
    pub failed: usize,
    /// Whether the flush stopped early because of cancellation.
    pub cancelled: bool,
}

struct Shared {
    resolver: Arc<dyn ConfigResolver>,
    files: Arc<dyn FileIndex>,
    documents: Arc<dyn DocumentStore>,
    structure: Arc<Generation>,
    executor: Arc<MainExecutor>,
    options: WatcherOptions,
    queue: FlushQueue,
    storage_lock: Mutex<()>,
    cancel: CancellationToken,
}

/// Turns root changes, file-system batches and live document edits into
/// configuration reloads and write-backs.
///
/// Cloning is cheap; clones share the same pending queue and timer.
#[derive(Clone)]
pub struct ChangeWatcher {
    shared: Arc<Shared>,
}

impl ChangeWatcher {
    /// Creates a new watcher.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Configuration resolver to schedule reloads on
    /// * `files` - File validity and membership queries
    /// * `documents` - Open documents that can be written back
    /// * `structure` - File-system structure generation, advanced on structural events
    /// * `executor` - Main execution context; its runtime also drives the flush timer
    /// * `options` - Recognized file names and debounce delay
    /// * `cancel` - Aborts pending timers and in-flight flushes
    pub fn new(
        resolver: Arc<dyn ConfigResolver>,
        files: Arc<dyn FileIndex>,
        documents: Arc<dyn DocumentStore>,
        structure: Arc<Generation>,
        executor: Arc<MainExecutor>,
        options: WatcherOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                resolver,
                files,
                documents,
                structure,
                executor,
                options,
                queue: FlushQueue::new(),
                storage_lock: Mutex::new(()),
                cancel,
            }),
        }
    }

    /// Handles a change of the project's roots or module model.
    ///
    /// Always schedules a reload, on the main executor.
    pub fn roots_changed(&self) {
        let resolver = self.shared.resolver.clone();
        let submitted = self.shared.executor.submit(move || {
            info!("Project roots changed, reloading configuration...");
            resolver.schedule_configuration_reload();
        });
        if !submitted {
            debug!("Main executor stopped, ignoring roots change");
        }
    }

    /// Handles a batch of file-system events.
    ///
    /// Returns whether a configuration reload was scheduled. At most one
    /// reload is scheduled per batch.
    pub fn files_changed(&self, events: &[FileEvent]) -> bool {
        let shared = &self.shared;

        let structural = events.iter().any(|event| {
            event.is_structural()
                && event
                    .file
                    .as_ref()
                    .is_some_and(|file| shared.files.is_in_project(file))
        });
        if structural {
            let generation = shared.structure.advance();
            debug!("File structure changed, generation {}", generation);
        }

        let changed = configurations_changed(
            events,
            shared.resolver.as_ref(),
            shared.files.as_ref(),
            &shared.options.config_file_names,
        );
        if changed {
            info!("Configuration file changed, reloading...");
            shared.resolver.schedule_configuration_reload();
        }
        changed
    }

    /// Handles a live edit of an open document.
    ///
    /// Returns whether the edit was queued for write-back.
    pub fn document_changed(&self, event: DocumentEvent) -> bool {
        let shared = &self.shared;
        let Some(file) = shared.documents.file_of(event.document) else {
            return false;
        };
        if file.is_synthetic() || !shared.options.config_file_names.matches(&file) {
            return false;
        }

        debug!("Configuration document edited: {}", file);
        shared.queue.push(WatchedEdit {
            file,
            document: event.document,
        });
        self.schedule_flush();
        true
    }

    /// Number of edits waiting for the next flush.
    pub fn pending_count(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn is_flush_armed(&self) -> bool {
        self.shared.queue.is_armed()
    }

    /// Writes every pending edit back to storage right away.
    ///
    /// Cancellation is checked between writes; edits not reached are
    /// discarded. Edits whose file became invalid are dropped silently.
    pub fn flush_now(&self) -> FlushSummary {
        let shared = &self.shared;
        let batch = shared.queue.take_pending();
        let mut summary = FlushSummary::default();
        if batch.is_empty() {
            return summary;
        }

        let _storage = shared.storage_lock.lock();
        for edit in &batch {
            if shared.cancel.is_cancelled() {
                debug!("Flush cancelled, discarding remaining edits");
                summary.cancelled = true;
                break;
            }
            if !shared.files.is_valid(&edit.file) {
                summary.dropped += 1;
                continue;
            }
            match shared.documents.save_document(edit.document) {
                Ok(true) => summary.saved += 1,
                Ok(false) => summary.unchanged += 1,
                Err(e) => {
                    warn!("Failed to save {}: {}", edit.file, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Flushed watched configuration files: {} saved, {} unchanged, {} dropped, {} failed",
            summary.saved, summary.unchanged, summary.dropped, summary.failed
        );
        summary
    }

    fn schedule_flush(&self) {
        if !self.shared.queue.try_arm() {
            return;
        }

        let watcher = self.clone();
        let delay = self.shared.options.flush_debounce;
        let cancel = self.shared.cancel.clone();
        self.shared.executor.handle().spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Flush timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let executor = watcher.shared.executor.clone();
                    let queued = watcher.clone();
                    let submitted = executor.submit(move || {
                        queued.shared.queue.disarm();
                        queued.flush_now();
                    });
                    if !submitted {
                        debug!("Main executor stopped, flush not run");
                        watcher.shared.queue.disarm();
                    }
                }
            }
        });
    }
}

impl fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("options", &self.shared.options)
            .field("pending", &self.pending_count())
            .field("armed", &self.is_flush_armed())
            .finish()
    }
}
