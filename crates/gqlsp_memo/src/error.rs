//! Shared error types.

use thiserror::Error;

/// Cooperative abort signal.
///
/// Raised when the surrounding work was torn down. It is never cached and
/// never reported as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;
