//! Scope-keyed schema cache.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use gqlsp_memo::{Cancelled, CombinedSource, Dependency, MemoCell};
use gqlsp_scope::{ConfigResolver, Scope, ScopeCache};
use gqlsp_vfs::FileRef;
use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    BuildError, RegistryBuilder, RegistryInfo, Schema, SchemaError, SchemaInfo, SchemaValidator,
};

/// Default number of schemas kept before eviction.
pub const DEFAULT_SCHEMA_CAPACITY: u64 = 256;

type SchemaMap = Cache<Arc<Scope>, Arc<SchemaInfo>>;

fn empty_schema() -> Arc<Schema> {
    static EMPTY: OnceLock<Arc<Schema>> = OnceLock::new();
    EMPTY.get_or_init(|| Arc::new(Schema::empty())).clone()
}

/// Builds and caches one schema per distinct resolve scope.
///
/// The scope-to-schema map is itself memoized on the schema-dependency
/// generation (configuration reloads combined with file-structure changes).
/// When that generation moves the whole map is dropped and replaced with an
/// empty one instead of sweeping individual entries.
///
/// Concurrent callers missing the same scope may build redundantly; the first
/// result published for a scope is the one every caller receives. Schema
/// builds run without any lock held.
pub struct SchemaCache {
    scopes: Arc<ScopeCache>,
    registry_builder: Arc<dyn RegistryBuilder>,
    validator: Arc<dyn SchemaValidator>,
    capacity: u64,
    dependencies: Dependency,
    scope_to_schema: MemoCell<SchemaMap>,
    map_replacement: Mutex<()>,
    last_build_id: AtomicU64,
}

impl SchemaCache {
    /// Creates a new schema cache.
    ///
    /// # Arguments
    ///
    /// * `scopes` - Scope cache used to key schemas
    /// * `registry_builder` - Source of type-definition registries
    /// * `validator` - Structural schema validator
    /// * `resolver` - Configuration resolver, one half of the schema dependencies
    /// * `structure` - File-system structure generation, the other half
    /// * `capacity` - Maximum number of schemas kept in memory
    pub fn new(
        scopes: Arc<ScopeCache>,
        registry_builder: Arc<dyn RegistryBuilder>,
        validator: Arc<dyn SchemaValidator>,
        resolver: Arc<dyn ConfigResolver>,
        structure: Dependency,
        capacity: u64,
    ) -> Self {
        let config: Dependency = resolver;
        let dependencies: Dependency = Arc::new(CombinedSource::new(vec![config, structure]));
        let scope_to_schema = MemoCell::new("schema map", vec![dependencies.clone()]);

        Self {
            scopes,
            registry_builder,
            validator,
            capacity,
            dependencies,
            scope_to_schema,
            map_replacement: Mutex::new(()),
            last_build_id: AtomicU64::new(0),
        }
    }

    /// The schema-dependency generation guarding the whole map.
    pub fn schema_dependencies(&self) -> &Dependency {
        &self.dependencies
    }

    /// Returns the schema visible from `context`, building it if needed.
    ///
    /// Build and validation problems are reported inside the returned
    /// [`SchemaInfo`]. Only cancellation is returned as an error; a cancelled
    /// build leaves nothing behind in the cache.
    pub fn schema_for(&self, context: Option<&FileRef>) -> Result<Arc<SchemaInfo>, Cancelled> {
        let scope = self.scopes.resolve_scope(context);
        let map = self.current_map();

        if let Some(info) = map.get(&scope) {
            return Ok(info);
        }

        let info = Arc::new(self.build(context, &scope)?);
        Ok(map.entry(scope).or_insert_with(|| info).into_value())
    }

    /// Returns whether a schema for `scope` is cached under the current
    /// schema-dependency generation.
    pub fn is_cached(&self, scope: &Scope) -> bool {
        self.scope_to_schema
            .peek()
            .is_some_and(|map| map.contains_key(scope))
    }

    /// Returns the number of schemas cached under the current generation.
    pub fn cached_entries(&self) -> u64 {
        self.scope_to_schema.peek().map_or(0, |map| {
            map.run_pending_tasks();
            map.entry_count()
        })
    }

    fn current_map(&self) -> SchemaMap {
        if let Some(map) = self.scope_to_schema.peek() {
            return map;
        }

        // Only one caller may replace the map, so concurrent misses publish
        // into the same one. Creating an empty map is cheap.
        let _replacing = self.map_replacement.lock();
        self.scope_to_schema.get_or_compute(|| {
            debug!("Schema dependencies changed, starting a new schema map");
            Cache::builder().max_capacity(self.capacity).build()
        })
    }

    fn build(&self, context: Option<&FileRef>, scope: &Scope) -> Result<SchemaInfo, Cancelled> {
        let start = Instant::now();
        let build_id = self.last_build_id.fetch_add(1, Ordering::Relaxed) + 1;

        let registry = match self.registry_builder.registry_info(context) {
            Ok(registry) => Arc::new(registry),
            Err(BuildError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                error!("Schema build error: {}", e);
                return Ok(SchemaInfo {
                    schema: empty_schema(),
                    errors: vec![e.into()],
                    registry: Arc::new(RegistryInfo::default()),
                    build_duration: start.elapsed(),
                    build_id,
                });
            }
        };

        let (schema, errors) = match self.assemble(&registry) {
            Ok(assembled) => assembled,
            Err(BuildError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                error!("Schema build error: {}", e);
                (empty_schema(), vec![SchemaError::from(e)])
            }
        };

        let build_duration = start.elapsed();
        match context {
            Some(file) => debug!(
                "Schema build completed in {} ms, requester: {}",
                build_duration.as_millis(),
                file
            ),
            None => debug!(
                "Schema build completed in {} ms, requester: {:?}",
                build_duration.as_millis(),
                scope
            ),
        }

        Ok(SchemaInfo {
            schema,
            errors,
            registry,
            build_duration,
            build_id,
        })
    }

    fn assemble(
        &self,
        registry: &RegistryInfo,
    ) -> Result<(Arc<Schema>, Vec<SchemaError>), BuildError> {
        let schema = Schema::from_registry(&registry.registry)?;
        let issues = self.validator.validate_schema(&schema)?;
        let errors = if issues.is_empty() {
            Vec::new()
        } else {
            vec![SchemaError::InvalidSchema(issues)]
        };
        Ok((Arc::new(schema), errors))
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("capacity", &self.capacity)
            .field("schema_map", &self.scope_to_schema)
            .field("last_build_id", &self.last_build_id.load(Ordering::Relaxed))
            .finish()
    }
}
