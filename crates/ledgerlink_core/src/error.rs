//! Error types for LedgerLink core.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in LedgerLink core operations.
///
/// Lookups that find nothing are not errors; they return `None` and leave
/// the decision to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A block, node or aggregation buffer could not be allocated.
    ///
    /// Raised both when the allocator refuses to grow a list and when a
    /// configured capacity limit is reached.
    #[error("no more resources available: {0}")]
    ResourceExhausted(String),
}

impl CoreError {
    /// Creates a resource exhausted error.
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::ResourceExhausted(message.into())
    }

    /// Returns true if this error reports resource exhaustion.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, CoreError::ResourceExhausted(_))
    }
}

impl From<TryReserveError> for CoreError {
    fn from(err: TryReserveError) -> Self {
        Self::ResourceExhausted(err.to_string())
    }
}
