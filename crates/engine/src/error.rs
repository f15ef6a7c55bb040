//! Unified error handling for the commerce engine.
//!
//! Absence (a missing product, a missing cart line) is a normal outcome and
//! is modeled as `Option`/`bool` results, never as an error. The variants
//! here cover the cases a caller can meaningfully react to; read paths
//! recover from remote outages internally and only surface `Storage` when
//! persisted state is malformed.

use thiserror::Error;

use crate::catalog::RemoteError;
use crate::store::StoreError;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced product does not exist in the resolved catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Structural validation failed; one message per offending field, in
    /// field-check order.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The remote catalog source is unreachable or returned an error.
    ///
    /// Read paths catch this internally and fall back to the local cache;
    /// mutation paths surface it to the caller.
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(#[from] RemoteError),

    /// A mutation was rejected (e.g., checkout attempted while the
    /// prescription gate is closed, or submission from an empty cart).
    #[error("Mutation rejected: {0}")]
    MutationRejected(String),

    /// Persisted state could not be read or written, or was malformed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type alias for `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_joins_messages() {
        let err = EngineError::Validation(vec![
            "Address is required".to_string(),
            "Phone is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Address is required, Phone is required"
        );
    }

    #[test]
    fn product_not_found_display() {
        let err = EngineError::ProductNotFound("101".to_string());
        assert_eq!(err.to_string(), "Product not found: 101");
    }
}
