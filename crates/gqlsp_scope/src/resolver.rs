//! Collaborators that scopes are computed from.

use std::path::PathBuf;

use gqlsp_memo::DependencySource;
use gqlsp_vfs::FileRef;

use crate::Scope;

/// A directory that holds a project configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigDir {
    pub dir: FileRef,
}

/// The part of a resolved project configuration that affects scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Scope used for symbol resolution.
    pub scope: Option<Scope>,
    /// Scope used for schema assembly.
    pub schema_scope: Option<Scope>,
}

/// Discovers and resolves project configuration files.
///
/// The resolver's stamp must advance every time a configuration reload
/// completes.
pub trait ConfigResolver: DependencySource {
    fn all_configs(&self) -> Vec<ConfigDir>;

    fn find_config_file_in_directory(&self, dir: &FileRef) -> Option<FileRef>;

    /// Returns the configuration owning `file`, if any.
    fn resolve_project_config(&self, file: &FileRef) -> Option<ProjectConfig>;

    /// Returns whether any configuration file exists in the workspace.
    fn has_configuration_files(&self) -> bool;

    /// Requests an asynchronous configuration reload.
    fn schedule_configuration_reload(&self);
}

/// An externally registered set of definition roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub source_roots: Vec<PathBuf>,
}

pub trait LibraryRootsProvider: Send + Sync {
    fn libraries(&self) -> Vec<Library>;
}
