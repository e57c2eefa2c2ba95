//! Schema error types.

use std::fmt;

use thiserror::Error;

use crate::RegistryError;

/// Failure raised by a schema build step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The build was aborted cooperatively.
    #[error("Schema build was cancelled")]
    Cancelled,

    /// Unexpected failure inside a build step.
    #[error("{0}")]
    Internal(String),
}

impl BuildError {
    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A single problem reported by structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Name of the rule that reported the issue.
    pub rule: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.rule)
    }
}

/// An error attached to a built schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Structural validation issues, aggregated into one error.
    #[error("Invalid schema: {}", join_issues(.0))]
    InvalidSchema(Vec<ValidationIssue>),

    /// A problem reported while collecting type definitions.
    #[error("Registry error: {0}")]
    Registry(RegistryError),

    /// The schema could not be assembled; the attached schema is empty.
    #[error("Schema build error: {0}")]
    Internal(String),
}

impl From<BuildError> for SchemaError {
    fn from(error: BuildError) -> Self {
        Self::Internal(error.to_string())
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
