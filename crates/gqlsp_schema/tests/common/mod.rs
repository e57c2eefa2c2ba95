#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use gqlsp_memo::{Dependency, DependencySource, Generation};
use gqlsp_schema::{
    BuildError, RegistryBuilder, RegistryInfo, Schema, SchemaCache, SchemaValidator,
    TypeDefinition, TypeDefinitionRegistry, ValidationIssue,
};
use gqlsp_scope::{
    ConfigDir, ConfigResolver, Library, LibraryRootsProvider, ProjectConfig, ScopeCache,
    ScopeOptions,
};
use gqlsp_vfs::{FileIndex, FileRef};
use parking_lot::Mutex;

#[derive(Default)]
pub struct TestResolver {
    pub generation: Generation,
    pub has_configs: AtomicBool,
    pub configs: Mutex<HashMap<PathBuf, ProjectConfig>>,
}

impl TestResolver {
    pub fn configure(&self, path: &str, config: ProjectConfig) {
        self.has_configs.store(true, Ordering::SeqCst);
        self.configs.lock().insert(PathBuf::from(path), config);
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

    fn resolve_project_config(&self, file: &FileRef) -> Option<ProjectConfig> {
        self.configs.lock().get(file.path()).cloned()
    }

    fn has_configuration_files(&self) -> bool {
        self.has_configs.load(Ordering::SeqCst)
    }

    fn schedule_configuration_reload(&self) {}
}

pub struct NoLibraries;

impl LibraryRootsProvider for NoLibraries {
    fn libraries(&self) -> Vec<Library> {
        Vec::new()
    }
}

pub struct AllFilesValid;

impl FileIndex for AllFilesValid {
    fn is_valid(&self, _file: &FileRef) -> bool {
        true
    }

    fn is_directory(&self, _file: &FileRef) -> bool {
        false
    }

    fn is_in_project(&self, _file: &FileRef) -> bool {
        true
    }

    fn modification_stamp(&self, _file: &FileRef) -> u64 {
        0
    }
}

/// What the next registry build produces.
#[derive(Debug, Clone)]
pub enum Outcome {
    Types(Vec<TypeDefinition>),
    Cancel,
    Fail(String),
}

pub struct TestRegistry {
    pub calls: AtomicUsize,
    pub outcome: Mutex<Outcome>,
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcome: Mutex::new(Outcome::Types(vec![
                TypeDefinition::object("Query").with_field("me", "User"),
                TypeDefinition::object("User").with_field("id", "ID"),
            ])),
        }
    }
}

impl TestRegistry {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set(&self, outcome: Outcome) {
        *self.outcome.lock() = outcome;
    }
}

impl RegistryBuilder for TestRegistry {
    fn registry_info(&self, _context: Option<&FileRef>) -> Result<RegistryInfo, BuildError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome.lock().clone() {
            Outcome::Types(types) => {
                let mut registry = TypeDefinitionRegistry::new();
                for definition in types {
                    registry.add(definition);
                }
                Ok(RegistryInfo::new(registry, Vec::new()))
            }
            Outcome::Cancel => Err(BuildError::Cancelled),
            Outcome::Fail(message) => Err(BuildError::internal(message)),
        }
    }
}

#[derive(Default)]
pub struct TestValidator {
    pub issues: Mutex<Vec<ValidationIssue>>,
    /// Makes validation report cancellation after the schema was assembled.
    pub cancel: AtomicBool,
}

impl SchemaValidator for TestValidator {
    fn validate_schema(&self, _schema: &Schema) -> Result<Vec<ValidationIssue>, BuildError> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(BuildError::Cancelled);
        }
        Ok(self.issues.lock().clone())
    }
}

pub struct Fixture {
    pub resolver: Arc<TestResolver>,
    pub structure: Arc<Generation>,
    pub registry: Arc<TestRegistry>,
    pub validator: Arc<TestValidator>,
    pub scopes: Arc<ScopeCache>,
    pub cache: SchemaCache,
}

impl Fixture {
    pub fn new() -> Self {
        let resolver = Arc::new(TestResolver::default());
        let structure = Arc::new(Generation::new());
        let registry = Arc::new(TestRegistry::default());
        let validator = Arc::new(TestValidator::default());

        let structure_dep: Dependency = structure.clone();
        let scopes = Arc::new(ScopeCache::new(
            "/project",
            resolver.clone(),
            Arc::new(NoLibraries),
            Arc::new(AllFilesValid),
            structure_dep.clone(),
            ScopeOptions::default(),
        ));
        let cache = SchemaCache::new(
            scopes.clone(),
            registry.clone(),
            validator.clone(),
            resolver.clone(),
            structure_dep,
            16,
        );

        Self {
            resolver,
            structure,
            registry,
            validator,
            scopes,
            cache,
        }
    }
}

/// Counts error-level log events whose message contains `needle`.
pub struct LogCounter {
    pub needle: &'static str,
    pub count: Arc<std::sync::Mutex<usize>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if *event.metadata().level() == tracing::Level::ERROR && visitor.0.contains(self.needle)
        {
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
