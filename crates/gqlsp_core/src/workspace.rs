//! Workspace context: one set of caches and one watcher per project.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gqlsp_memo::{Cancelled, Dependency, Generation};
use gqlsp_schema::{RegistryBuilder, SchemaCache, SchemaInfo, SchemaValidator};
use gqlsp_scope::{
    ConfigResolver, LibraryRootsProvider, Scope, ScopeCache, ScopeFlavor, ScopeOptions,
};
use gqlsp_vfs::{FileIndex, FileRef, OsFileIndex};
use gqlsp_watcher::{ChangeWatcher, DocumentStore, MainExecutor, WatcherOptions};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{EngineConfig, EngineError};

/// External services a workspace is built on.
pub struct Collaborators {
    pub resolver: Arc<dyn ConfigResolver>,
    pub libraries: Arc<dyn LibraryRootsProvider>,
    pub registry_builder: Arc<dyn RegistryBuilder>,
    pub validator: Arc<dyn SchemaValidator>,
    pub documents: Arc<dyn DocumentStore>,
    /// File queries; defaults to the local file system under the root.
    pub files: Option<Arc<dyn FileIndex>>,
}

/// The caching engine for one project.
///
/// Owns the main executor, the scope and schema caches and the change
/// watcher. Nothing is shared between workspaces.
pub struct Workspace {
    root: PathBuf,
    config: EngineConfig,
    structure: Arc<Generation>,
    executor: Arc<MainExecutor>,
    scopes: Arc<ScopeCache>,
    schemas: SchemaCache,
    watcher: ChangeWatcher,
    cancel: CancellationToken,
}

impl Workspace {
    /// Creates a workspace rooted at `root`.
    ///
    /// Must be called from within a tokio runtime; the executor and flush
    /// timers are spawned on it.
    pub fn init(
        root: impl Into<PathBuf>,
        config: EngineConfig,
        collaborators: Collaborators,
    ) -> Result<Self, EngineError> {
        let root = root.into();
        let handle = Handle::try_current().map_err(|e| {
            EngineError::runtime(format!("Workspace must be created inside a tokio runtime: {}", e))
        })?;
        validate(&config)?;

        let Collaborators {
            resolver,
            libraries,
            registry_builder,
            validator,
            documents,
            files,
        } = collaborators;
        let files = files.unwrap_or_else(|| Arc::new(OsFileIndex::new(root.clone())));

        let structure = Arc::new(Generation::new());
        let structure_dep: Dependency = structure.clone();
        let cancel = CancellationToken::new();
        let executor = Arc::new(MainExecutor::start(&handle));

        let scopes = Arc::new(ScopeCache::new(
            root.clone(),
            resolver.clone(),
            libraries,
            files.clone(),
            structure_dep.clone(),
            ScopeOptions {
                file_types: config.file_types.iter().cloned().collect(),
                meta_scope: config.meta_scope(&root),
                capacity: config.scope_cache_capacity,
            },
        ));

        let schemas = SchemaCache::new(
            scopes.clone(),
            registry_builder,
            validator,
            resolver.clone(),
            structure_dep,
            config.schema_cache_capacity,
        );

        let watcher = ChangeWatcher::new(
            resolver,
            files,
            documents,
            structure.clone(),
            executor.clone(),
            WatcherOptions {
                config_file_names: config.config_file_names(),
                flush_debounce: config.flush_debounce(),
            },
            cancel.clone(),
        );

        info!("Workspace initialized at {}", root.display());
        debug!("Workspace configuration: {:?}", config);

        Ok(Self {
            root,
            config,
            structure,
            executor,
            scopes,
            schemas,
            watcher,
            cancel,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scopes(&self) -> &ScopeCache {
        &self.scopes
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    pub fn watcher(&self) -> &ChangeWatcher {
        &self.watcher
    }

    pub fn executor(&self) -> &MainExecutor {
        &self.executor
    }

    /// Current file-system structure generation.
    pub fn structure_generation(&self) -> u64 {
        self.structure.current()
    }

    pub fn scope_for(&self, file: Option<&FileRef>, flavor: ScopeFlavor) -> Arc<Scope> {
        self.scopes.scope_for(file, flavor)
    }

    pub fn resolve_scope(&self, file: Option<&FileRef>) -> Arc<Scope> {
        self.scopes.resolve_scope(file)
    }

    pub fn schema_for(&self, file: Option<&FileRef>) -> Result<Arc<SchemaInfo>, Cancelled> {
        self.schemas.schema_for(file)
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Tears the workspace down.
    ///
    /// Pending flush timers and in-flight flushes are cancelled, jobs already
    /// queued on the executor are drained, then the executor stops. Edits
    /// still pending are not written; call
    /// [`ChangeWatcher::flush_now`] first to keep them.
    pub async fn dispose(self) {
        self.cancel.cancel();
        self.executor.barrier().await;
        self.executor.shutdown().await;
        info!("Workspace at {} disposed", self.root.display());
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("root", &self.root)
            .field("structure_generation", &self.structure_generation())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn validate(config: &EngineConfig) -> Result<(), EngineError> {
    if config.file_types.is_empty() {
        return Err(EngineError::config("fileTypes must not be empty"));
    }
    if config.schema_cache_capacity == 0 || config.scope_cache_capacity == 0 {
        return Err(EngineError::config("Cache capacities must be positive"));
    }
    Ok(())
}
