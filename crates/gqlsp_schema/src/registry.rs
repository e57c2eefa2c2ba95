//! Type-definition registry model.

use std::collections::BTreeMap;

use gqlsp_vfs::FileRef;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    /// Named type of the field, without list or non-null wrappers.
    pub type_name: String,
}

/// A named type declared somewhere in the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldDefinition>,
    /// File that declared the type, if known.
    pub source: Option<FileRef>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            source: None,
        }
    }

    /// Creates an object type without fields.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    pub fn with_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn with_source(mut self, source: FileRef) -> Self {
        self.source = Some(source);
        self
    }
}

/// Root operation types named by an explicit `schema { ... }` definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDefinition {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// All type definitions visible in one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefinitionRegistry {
    types: BTreeMap<String, TypeDefinition>,
    schema_definition: Option<SchemaDefinition>,
}

impl TypeDefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type, returning the definition it replaced.
    pub fn add(&mut self, definition: TypeDefinition) -> Option<TypeDefinition> {
        self.types.insert(definition.name.clone(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn schema_definition(&self) -> Option<&SchemaDefinition> {
        self.schema_definition.as_ref()
    }

    pub fn set_schema_definition(&mut self, definition: SchemaDefinition) {
        self.schema_definition = Some(definition);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A non-fatal problem found while collecting type definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RegistryError {
    pub message: String,
    pub file: Option<FileRef>,
}

impl RegistryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
        }
    }

    pub fn in_file(message: impl Into<String>, file: FileRef) -> Self {
        Self {
            message: message.into(),
            file: Some(file),
        }
    }
}

/// A registry together with the errors reported while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryInfo {
    pub registry: TypeDefinitionRegistry,
    pub errors: Vec<RegistryError>,
}

impl RegistryInfo {
    pub fn new(registry: TypeDefinitionRegistry, errors: Vec<RegistryError>) -> Self {
        Self { registry, errors }
    }
}
