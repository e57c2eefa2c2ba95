//! Collaborators consumed by the schema cache.

use gqlsp_vfs::FileRef;

use crate::{BuildError, RegistryInfo, Schema, ValidationIssue};

/// Collects the type definitions visible from a context file.
///
/// Registry-level problems belong in [`RegistryInfo::errors`]; an `Err` is
/// reserved for cancellation and unexpected failures.
pub trait RegistryBuilder: Send + Sync {
    fn registry_info(&self, context: Option<&FileRef>) -> Result<RegistryInfo, BuildError>;
}

/// Checks a schema for structural problems.
pub trait SchemaValidator: Send + Sync {
    fn validate_schema(&self, schema: &Schema) -> Result<Vec<ValidationIssue>, BuildError>;
}
