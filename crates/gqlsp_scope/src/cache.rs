//! Memoized per-file scope lookup.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use gqlsp_memo::{Dependency, DependencySource, MemoCell};
use gqlsp_vfs::{FileIndex, FileRef};
use moka::sync::Cache;
use tracing::debug;

use crate::{ConfigResolver, LibraryRootsProvider, ProjectConfig, Scope};

/// File extensions admitted by every scope unless configured otherwise.
pub const DEFAULT_FILE_TYPES: &[&str] = &["graphql", "graphqls", "gql"];

/// Default number of per-file cells kept before eviction.
pub const DEFAULT_SCOPE_CAPACITY: u64 = 10_000;

/// Which scope a caller needs.
///
/// Both flavors run the same algorithm; they differ only in which field of
/// the owning project configuration is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeFlavor {
    /// Scope for symbol resolution.
    Resolve,
    /// Scope for schema assembly.
    Schema,
}

impl ScopeFlavor {
    fn select(self, config: ProjectConfig) -> Option<Scope> {
        match self {
            Self::Resolve => config.scope,
            Self::Schema => config.schema_scope,
        }
    }
}

/// Tunables for [`ScopeCache`].
#[derive(Debug, Clone)]
pub struct ScopeOptions {
    /// Extension allow-list applied to every computed scope.
    pub file_types: BTreeSet<String>,
    /// Process-wide scope unioned into every computed scope.
    pub meta_scope: Scope,
    /// Maximum number of per-file cells kept in memory.
    pub capacity: u64,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            file_types: DEFAULT_FILE_TYPES.iter().map(|ext| ext.to_string()).collect(),
            meta_scope: Scope::Empty,
            capacity: DEFAULT_SCOPE_CAPACITY,
        }
    }
}

/// Stamp source tracking modifications of a single file.
struct FileStamp {
    files: Arc<dyn FileIndex>,
    file: FileRef,
}

impl DependencySource for FileStamp {
    fn stamp(&self) -> u64 {
        self.files.modification_stamp(&self.file)
    }
}

type ScopeCell = Arc<MemoCell<Arc<Scope>>>;

/// Computes and caches the visibility scope of every source file.
///
/// The global scope is shared by all files and computed once per
/// configuration/file-structure generation. Per-file results live in a
/// bounded map; evicting a cell only costs a recomputation.
pub struct ScopeCache {
    project_root: PathBuf,
    resolver: Arc<dyn ConfigResolver>,
    libraries: Arc<dyn LibraryRootsProvider>,
    files: Arc<dyn FileIndex>,
    structure: Dependency,
    options: ScopeOptions,
    global: MemoCell<Arc<Scope>>,
    per_file: Cache<(FileRef, ScopeFlavor), ScopeCell>,
}

impl ScopeCache {
    /// Creates a new scope cache.
    ///
    /// # Arguments
    ///
    /// * `project_root` - Root of the project content
    /// * `resolver` - Project configuration resolver
    /// * `libraries` - Provider of external definition roots
    /// * `files` - File validity and modification queries
    /// * `structure` - File-system structure generation
    /// * `options` - File-type allow-list, meta scope and capacity
    pub fn new(
        project_root: impl Into<PathBuf>,
        resolver: Arc<dyn ConfigResolver>,
        libraries: Arc<dyn LibraryRootsProvider>,
        files: Arc<dyn FileIndex>,
        structure: Dependency,
        options: ScopeOptions,
    ) -> Self {
        let config: Dependency = resolver.clone();
        let global = MemoCell::new("global scope", vec![config, structure.clone()]);
        let per_file = Cache::builder().max_capacity(options.capacity).build();

        Self {
            project_root: project_root.into(),
            resolver,
            libraries,
            files,
            structure,
            options,
            global,
            per_file,
        }
    }

    /// Returns the scope used for symbol resolution in `file`.
    pub fn resolve_scope(&self, file: Option<&FileRef>) -> Arc<Scope> {
        self.scope_for(file, ScopeFlavor::Resolve)
    }

    /// Returns the scope used for schema assembly in `file`.
    pub fn schema_scope(&self, file: Option<&FileRef>) -> Arc<Scope> {
        self.scope_for(file, ScopeFlavor::Schema)
    }

    /// Returns the scope of `file` for the given flavor.
    ///
    /// Without a file there is nothing to resolve against and the result is
    /// [`Scope::Empty`].
    pub fn scope_for(&self, file: Option<&FileRef>, flavor: ScopeFlavor) -> Arc<Scope> {
        let Some(file) = file else {
            return Arc::new(Scope::Empty);
        };

        let cell = self
            .per_file
            .get_with((file.clone(), flavor), || Arc::new(self.new_file_cell(file)));
        cell.get_or_compute(|| Arc::new(self.compute_file_scope(file, flavor)))
    }

    /// Returns the scope used when the workspace has no configuration files.
    pub fn global_scope(&self) -> Arc<Scope> {
        self.global.get_or_compute(|| Arc::new(self.create_scope(None)))
    }

    /// Drops the cached scopes of `file`.
    pub fn forget(&self, file: &FileRef) {
        for flavor in [ScopeFlavor::Resolve, ScopeFlavor::Schema] {
            self.per_file.invalidate(&(file.clone(), flavor));
        }
    }

    /// Returns the number of per-file cells currently held.
    pub fn len(&self) -> u64 {
        self.per_file.run_pending_tasks();
        self.per_file.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn new_file_cell(&self, file: &FileRef) -> MemoCell<Arc<Scope>> {
        let owner: Dependency = Arc::new(FileStamp {
            files: self.files.clone(),
            file: file.clone(),
        });
        let config: Dependency = self.resolver.clone();
        MemoCell::new("file scope", vec![owner, config, self.structure.clone()])
    }

    fn compute_file_scope(&self, file: &FileRef, flavor: ScopeFlavor) -> Scope {
        let explicit = self
            .resolver
            .resolve_project_config(file)
            .and_then(|config| flavor.select(config));

        if let Some(scope) = explicit {
            debug!(file = %file, ?flavor, "Using project configuration scope");
            return self.create_scope(Some(scope));
        }

        if !self.resolver.has_configuration_files() {
            return (*self.global_scope()).clone();
        }

        debug!(file = %file, ?flavor, "File has no owning configuration, using file scope");
        self.create_scope(Some(Scope::file(file.path())))
    }

    /// Builds a scope from `custom` (or the whole project) plus library roots
    /// and the meta scope. The file-type restriction is applied last.
    fn create_scope(&self, custom: Option<Scope>) -> Scope {
        let base = custom.unwrap_or_else(|| Scope::roots([self.project_root.clone()]));
        base.union(self.library_scope())
            .union(self.options.meta_scope.clone())
            .restrict_to_file_types(&self.options.file_types)
    }

    fn library_scope(&self) -> Scope {
        let roots = self
            .libraries
            .libraries()
            .into_iter()
            .flat_map(|library| library.source_roots);
        Scope::roots(roots)
    }
}

impl fmt::Debug for ScopeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeCache")
            .field("project_root", &self.project_root)
            .field("options", &self.options)
            .field("global", &self.global)
            .finish()
    }
}
