//! # gqlsp_scope
//!
//! Visibility scopes for GraphQL source files.
//!
//! A scope decides which files contribute type definitions when resolving
//! symbols in a given file. Scopes are plain values: equal scopes compare and
//! hash equal, which lets downstream caches key on them.
//!
//! This crate provides:
//! - [`Scope`], the set-of-files predicate
//! - [`ConfigResolver`] and [`LibraryRootsProvider`], the collaborators a
//!   scope is computed from
//! - [`ScopeCache`], the per-file memoized scope lookup

mod cache;
mod resolver;
mod scope;

pub use cache::{DEFAULT_FILE_TYPES, DEFAULT_SCOPE_CAPACITY, ScopeCache, ScopeFlavor, ScopeOptions};
pub use resolver::{ConfigDir, ConfigResolver, Library, LibraryRootsProvider, ProjectConfig};
pub use scope::Scope;
