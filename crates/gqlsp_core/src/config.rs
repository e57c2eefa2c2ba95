//! Engine configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use gqlsp_scope::{DEFAULT_FILE_TYPES, Scope};
use gqlsp_watcher::{ConfigFileNames, DEFAULT_CONFIG_FILE_NAMES, DEFAULT_FLUSH_DEBOUNCE_MS};
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::EngineError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/engine.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration for a [`Workspace`](crate::Workspace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// File names recognized as project configuration.
    #[serde(default = "default_config_file_names")]
    pub config_file_names: Vec<String>,

    /// Extensions admitted by every scope.
    #[serde(default = "default_file_types")]
    pub file_types: Vec<String>,

    /// Write-back delay for edited configuration files.
    #[serde(default = "default_flush_debounce_ms")]
    pub flush_debounce_ms: u64,

    #[serde(default = "default_schema_cache_capacity")]
    pub schema_cache_capacity: u64,

    #[serde(default = "default_scope_cache_capacity")]
    pub scope_cache_capacity: u64,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directories visible from every file, relative to the project root
    /// unless absolute.
    #[serde(default)]
    pub meta_roots: Vec<PathBuf>,
}

fn default_config_file_names() -> Vec<String> {
    DEFAULT_CONFIG_FILE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_file_types() -> Vec<String> {
    DEFAULT_FILE_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_flush_debounce_ms() -> u64 {
    DEFAULT_FLUSH_DEBOUNCE_MS
}

fn default_schema_cache_capacity() -> u64 {
    gqlsp_schema::DEFAULT_SCHEMA_CAPACITY
}

fn default_scope_cache_capacity() -> u64 {
    gqlsp_scope::DEFAULT_SCOPE_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            config_file_names: default_config_file_names(),
            file_types: default_file_types(),
            flush_debounce_ms: default_flush_debounce_ms(),
            schema_cache_capacity: default_schema_cache_capacity(),
            scope_cache_capacity: default_scope_cache_capacity(),
            log_level: default_log_level(),
            meta_roots: Vec::new(),
        }
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| EngineError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA
            .get_or_init(compile_schema)
            .as_ref()
            .map_err(|e| EngineError::internal(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(EngineError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| EngineError::config(format!("Invalid config: {}", e)))
    }

    pub fn flush_debounce(&self) -> Duration {
        Duration::from_millis(self.flush_debounce_ms)
    }

    pub fn config_file_names(&self) -> ConfigFileNames {
        ConfigFileNames::new(self.config_file_names.iter().cloned())
    }

    /// The meta scope: every meta root, resolved against `project_root`.
    pub fn meta_scope(&self, project_root: &Path) -> Scope {
        Scope::roots(self.meta_roots.iter().map(|root| project_root.join(root)))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_schema() -> Result<Validator, String> {
    let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
        .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
    Validator::new(&schema_json).map_err(|e| format!("Invalid config schema compilation: {}", e))
}
