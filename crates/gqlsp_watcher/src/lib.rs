//! # gqlsp_watcher
//!
//! Keeps project configuration in sync with what the user is doing.
//!
//! The watcher reacts to three kinds of input:
//! - project root changes, which always schedule a configuration reload
//! - batches of file-system events, classified to decide whether any of them
//!   touches a configuration file or directory
//! - live edits of open configuration documents, which are written back to
//!   disk after a debounce window so the reload picks them up
//!
//! Reloads and write-backs run on the [`MainExecutor`], a single FIFO context.

mod classify;
mod debounce;
mod documents;
mod error;
mod event;
mod executor;
mod watcher;

pub use classify::{ConfigFileNames, DEFAULT_CONFIG_FILE_NAMES, configurations_changed};
pub use debounce::{DEFAULT_FLUSH_DEBOUNCE_MS, FlushQueue, WatchedEdit};
pub use documents::{DocumentStore, FsDocumentStore};
pub use error::StorageError;
pub use event::{DocumentEvent, FileEvent, FileEventKind, FileProperty};
pub use executor::MainExecutor;
pub use watcher::{ChangeWatcher, FlushSummary, WatcherOptions};
