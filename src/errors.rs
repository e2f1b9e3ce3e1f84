//! Error types for trigger helper operations

use thiserror::Error;

/// Errors that can occur in trigger helper operations
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Document read error
    #[error("Store read error: {0}")]
    StoreRead(String),

    /// Document write error
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// Query error
    #[error("Store query error: {0}")]
    StoreQuery(String),

    /// Batch delete error
    #[error("Batch delete error: {0}")]
    BatchDelete(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Resource path could not be parsed into collection/document segments
    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    /// Generic trigger helper error
    #[error("Trigger error: {0}")]
    Generic(String),
}

/// Result type for trigger helper operations
pub type TriggerResult<T> = Result<T, TriggerError>;

impl From<serde_json::Error> for TriggerError {
    fn from(err: serde_json::Error) -> Self {
        TriggerError::Serialization(err.to_string())
    }
}

/// Policy applied to a store write issued from inside a helper.
///
/// The platform runtime retries a failed invocation wholesale, so the
/// historical behavior is to log a failed downstream write and report
/// success anyway. `BestEffort` preserves that; `Propagate` surfaces the
/// error to the caller so it can retry or escalate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Log the failure and continue (the default)
    #[default]
    BestEffort,
    /// Return the failure to the caller
    Propagate,
}

impl WritePolicy {
    /// Resolve a write result under this policy.
    pub fn apply(self, result: TriggerResult<()>, what: &str) -> TriggerResult<()> {
        match (self, result) {
            (_, Ok(())) => Ok(()),
            (WritePolicy::BestEffort, Err(e)) => {
                tracing::warn!("Best-effort {} failed: {}", what, e);
                Ok(())
            }
            (WritePolicy::Propagate, Err(e)) => Err(e),
        }
    }
}
