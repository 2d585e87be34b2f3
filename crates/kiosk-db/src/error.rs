//! # Database Error Types
//!
//! Error handling for the storage layer.
//!
//! ## Error Translation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Translation Flow                               │
//! │                                                                         │
//! │  kiosk_core::ValidationError ──┐                                       │
//! │  kiosk_core::SchemaError ──────┤  #[from]                              │
//! │                                ▼                                        │
//! │  sqlx::Error ──────────► StoreError ──────────► caller                 │
//! │                                                                         │
//! │  Pool faults become ConnectionFailed; everything else from sqlx        │
//! │  passes through verbatim as Storage. The store never retries and       │
//! │  never swallows: a failed statement surfaces exactly once.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kiosk_core::{SchemaError, ValidationError};

// =============================================================================
// Store Error
// =============================================================================

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed row does not exist.
    ///
    /// ## When This Occurs
    /// - `update`/`adjust` on an id that was deleted
    /// - A foreign-key value pointing at a missing row
    /// - An empty `update` used as an existence probe
    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: String },

    /// Record or form input failed validation. Recoverable: nothing was
    /// written, the caller shows the message and the user fixes the field.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Registry lookup or bootstrap failure. Fatal at startup.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// An aggregate request that cannot be rendered into SQL: joining
    /// through a field that is not a reference, or summing a field that
    /// is not numeric.
    #[error("Invalid aggregate: {0}")]
    InvalidAggregate(String),

    /// Could not reach the database (open, pool exhausted, pool closed).
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other database failure, passed through unchanged.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Creates a NotFound error.
    ///
    /// ## Example
    /// ```rust,ignore
    /// return Err(StoreError::not_found("flowers", id));
    /// ```
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Maps sqlx errors to our domain errors.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed("connection pool is closed".to_string())
            }
            sqlx::Error::Io(e) => StoreError::ConnectionFailed(e.to_string()),
            other => StoreError::Storage(other.to_string()),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("flowers", 42);
        assert_eq!(err.to_string(), "flowers with id 42 not found");
    }

    #[test]
    fn test_validation_error_converts() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let store_err: StoreError = validation_err.into();
        assert!(matches!(store_err, StoreError::Validation(_)));
        assert_eq!(store_err.to_string(), "Validation error: name is required");
    }

    #[test]
    fn test_pool_errors_become_connection_failed() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::ConnectionFailed(_)));
    }
}
