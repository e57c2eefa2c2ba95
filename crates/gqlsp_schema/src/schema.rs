//! Structural (unexecutable) schema.

use std::collections::BTreeMap;

use crate::{BuildError, TypeDefinition, TypeDefinitionRegistry, TypeKind};

const DEFAULT_QUERY: &str = "Query";
const DEFAULT_MUTATION: &str = "Mutation";
const DEFAULT_SUBSCRIPTION: &str = "Subscription";

/// A schema assembled from a type-definition registry.
///
/// The schema only describes structure; it carries no resolvers and cannot
/// execute operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    query: String,
    mutation: Option<String>,
    subscription: Option<String>,
    types: BTreeMap<String, TypeDefinition>,
}

impl Schema {
    /// The minimal valid schema: a `Query` type without fields.
    pub fn empty() -> Self {
        let query = TypeDefinition::object(DEFAULT_QUERY);
        Self {
            query: query.name.clone(),
            mutation: None,
            subscription: None,
            types: BTreeMap::from([(query.name.clone(), query)]),
        }
    }

    /// Assembles a schema from the definitions in `registry`.
    ///
    /// Root operation types come from the registry's schema definition and
    /// default to `Query`, `Mutation` and `Subscription`. A missing default
    /// query type is synthesized without fields; a root named by an explicit
    /// schema definition must exist and be an object type.
    pub fn from_registry(registry: &TypeDefinitionRegistry) -> Result<Self, BuildError> {
        let mut types: BTreeMap<String, TypeDefinition> = registry
            .types()
            .map(|definition| (definition.name.clone(), definition.clone()))
            .collect();
        let definition = registry.schema_definition();

        let query = match definition.and_then(|d| d.query.as_deref()) {
            Some(name) => explicit_root(&types, "query", name)?,
            None => {
                types
                    .entry(DEFAULT_QUERY.to_string())
                    .or_insert_with(|| TypeDefinition::object(DEFAULT_QUERY));
                explicit_root(&types, "query", DEFAULT_QUERY)?
            }
        };

        let mutation = match definition.and_then(|d| d.mutation.as_deref()) {
            Some(name) => Some(explicit_root(&types, "mutation", name)?),
            None => implicit_root(&types, "mutation", DEFAULT_MUTATION)?,
        };

        let subscription = match definition.and_then(|d| d.subscription.as_deref()) {
            Some(name) => Some(explicit_root(&types, "subscription", name)?),
            None => implicit_root(&types, "subscription", DEFAULT_SUBSCRIPTION)?,
        };

        Ok(Self {
            query,
            mutation,
            subscription,
            types,
        })
    }

    pub fn query_type(&self) -> Option<&TypeDefinition> {
        self.types.get(&self.query)
    }

    pub fn mutation_type(&self) -> Option<&TypeDefinition> {
        self.mutation.as_ref().and_then(|name| self.types.get(name))
    }

    pub fn subscription_type(&self) -> Option<&TypeDefinition> {
        self.subscription.as_ref().and_then(|name| self.types.get(name))
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }
}

fn explicit_root(
    types: &BTreeMap<String, TypeDefinition>,
    operation: &str,
    name: &str,
) -> Result<String, BuildError> {
    match types.get(name) {
        Some(definition) if definition.kind == TypeKind::Object => Ok(name.to_string()),
        Some(_) => Err(BuildError::internal(format!(
            "{operation} root type `{name}` must be an object type"
        ))),
        None => Err(BuildError::internal(format!(
            "{operation} root type `{name}` is not defined"
        ))),
    }
}

fn implicit_root(
    types: &BTreeMap<String, TypeDefinition>,
    operation: &str,
    name: &str,
) -> Result<Option<String>, BuildError> {
    match types.get(name) {
        Some(_) => explicit_root(types, operation, name).map(Some),
        None => Ok(None),
    }
}
