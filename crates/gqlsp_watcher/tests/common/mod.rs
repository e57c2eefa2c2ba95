#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gqlsp_memo::{DependencySource, Generation};
use gqlsp_scope::{ConfigDir, ConfigResolver, ProjectConfig};
use gqlsp_vfs::{DocumentId, FileRef, OsFileIndex};
use gqlsp_watcher::{
    ChangeWatcher, ConfigFileNames, DocumentStore, FsDocumentStore, MainExecutor, StorageError,
    WatcherOptions,
};
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct TestResolver {
    pub generation: Generation,
    pub reloads: AtomicUsize,
}

impl TestResolver {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl DependencySource for TestResolver {
    fn stamp(&self) -> u64 {
        self.generation.current()
    }
}

impl ConfigResolver for TestResolver {
    fn all_configs(&self) -> Vec<ConfigDir> {
        Vec::new()
    }

    fn find_config_file_in_directory(&self, _dir: &FileRef) -> Option<FileRef> {
        None
    }

    fn resolve_project_config(&self, _file: &FileRef) -> Option<ProjectConfig> {
        None
    }

    fn has_configuration_files(&self) -> bool {
        true
    }

    fn schedule_configuration_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.generation.advance();
    }
}

/// Counts saves and optionally cancels a token after the first write.
pub struct CountingStore {
    pub inner: FsDocumentStore,
    pub saves: AtomicUsize,
    pub cancel_after_first_save: Option<CancellationToken>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: FsDocumentStore::new(),
            saves: AtomicUsize::new(0),
            cancel_after_first_save: None,
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl DocumentStore for CountingStore {
    fn file_of(&self, document: DocumentId) -> Option<FileRef> {
        self.inner.file_of(document)
    }

    fn save_document(&self, document: DocumentId) -> Result<bool, StorageError> {
        let saved = self.inner.save_document(document)?;
        if saved {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if let Some(token) = &self.cancel_after_first_save {
                token.cancel();
            }
        }
        Ok(saved)
    }
}

pub struct Harness {
    pub temp: TempDir,
    pub resolver: Arc<TestResolver>,
    pub store: Arc<CountingStore>,
    pub structure: Arc<Generation>,
    pub executor: Arc<MainExecutor>,
    pub cancel: CancellationToken,
    pub watcher: ChangeWatcher,
}

impl Harness {
    pub fn new(debounce: Duration) -> Self {
        Self::with_store(debounce, |_| CountingStore::new())
    }

    pub fn with_store(
        debounce: Duration,
        make_store: impl FnOnce(&CancellationToken) -> CountingStore,
    ) -> Self {
        let temp = TempDir::new().unwrap();
        let resolver = Arc::new(TestResolver::default());
        let cancel = CancellationToken::new();
        let store = Arc::new(make_store(&cancel));
        let structure = Arc::new(Generation::new());
        let executor = Arc::new(MainExecutor::start(&Handle::current()));

        let watcher = ChangeWatcher::new(
            resolver.clone(),
            Arc::new(OsFileIndex::new(temp.path())),
            store.clone(),
            structure.clone(),
            executor.clone(),
            WatcherOptions {
                config_file_names: ConfigFileNames::new(["graphql.config.json"]),
                flush_debounce: debounce,
            },
            cancel.clone(),
        );

        Self {
            temp,
            resolver,
            store,
            structure,
            executor,
            cancel,
            watcher,
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Creates `relative` on disk with `content` and opens it.
    pub fn open(&self, relative: &str, content: &str) -> DocumentId {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        self.store.inner.open(FileRef::new(path)).unwrap()
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn file(&self, relative: &str) -> FileRef {
        FileRef::new(self.path(relative))
    }
}

/// Counts log events whose message contains `needle`.
pub struct LogCounter {
    pub needle: &'static str,
    pub count: Arc<Mutex<usize>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.contains(self.needle) {
            *self.count.lock().unwrap() += 1;
        }
    }
}

pub struct MessageVisitor(pub String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }
}
