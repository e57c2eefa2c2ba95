//! Cached schema build results.

use std::sync::Arc;
use std::time::Duration;

use crate::{RegistryInfo, Schema, SchemaError};

/// The outcome of one schema build.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub schema: Arc<Schema>,
    /// Errors raised while assembling or validating the schema, in order.
    pub errors: Vec<SchemaError>,
    /// Registry the schema was built from.
    pub registry: Arc<RegistryInfo>,
    /// Time spent building.
    pub build_duration: Duration,
    /// Strictly increasing id of the build that produced this, per cache.
    pub build_id: u64,
}

impl SchemaInfo {
    /// Returns true when neither the registry nor the schema reported errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.registry.errors.is_empty()
    }

    /// Registry errors followed by schema errors, for presentation.
    pub fn all_errors(&self) -> Vec<SchemaError> {
        self.registry
            .errors
            .iter()
            .cloned()
            .map(SchemaError::Registry)
            .chain(self.errors.iter().cloned())
            .collect()
    }
}
