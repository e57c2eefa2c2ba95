//! # gqlsp_schema
//!
//! Compiled and validated schemas, cached per visibility scope.
//!
//! ## Cache Strategy
//!
//! 1. **Scope-keyed**: files whose scopes compare equal share one schema
//! 2. **Whole-map invalidation**: when the schema-dependency generation moves
//!    the entire map is replaced by an empty one
//! 3. **Bounded**: entries may be evicted at any time and are rebuilt on demand
//!
//! Type-definition registries and structural validation come from
//! collaborators ([`RegistryBuilder`], [`SchemaValidator`]); this crate turns
//! their output into a [`SchemaInfo`] and keeps it correct.

mod cache;
mod error;
mod info;
mod provider;
mod registry;
mod schema;

pub use cache::{DEFAULT_SCHEMA_CAPACITY, SchemaCache};
pub use error::{BuildError, SchemaError, ValidationIssue};
pub use info::SchemaInfo;
pub use provider::{RegistryBuilder, SchemaValidator};
pub use registry::{
    FieldDefinition, RegistryError, RegistryInfo, SchemaDefinition, TypeDefinition,
    TypeDefinitionRegistry, TypeKind,
};
pub use schema::Schema;

pub use gqlsp_memo::Cancelled;
