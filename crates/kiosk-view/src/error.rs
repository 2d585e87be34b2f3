//! # Binding Error Types
//!
//! What the widget layer sees when a binding operation fails.
//!
//! ## Error Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Kinds of Failure                                 │
//! │                                                                         │
//! │  BindError::Validation ─► the user typed something wrong               │
//! │                           show form_message(), keep the form open      │
//! │                                                                         │
//! │  BindError::Store ──────► the engine failed (connection, missing row)  │
//! │                           propagate; not a form-level message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kiosk_core::ValidationError;
use kiosk_db::StoreError;

// =============================================================================
// Bind Error
// =============================================================================

/// Binding operation errors.
#[derive(Debug, Error)]
pub enum BindError {
    /// The submitted input failed validation. Nothing was written; the
    /// message names the offending field and the user can correct it.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The store failed. Not correctable from the form.
    #[error(transparent)]
    Store(StoreError),
}

impl BindError {
    /// The user-facing form message, when this error is one.
    ///
    /// Store failures return `None`: they are reported through the
    /// application's error path, not as a field hint.
    pub fn form_message(&self) -> Option<String> {
        match self {
            BindError::Validation(err) => Some(err.to_string()),
            BindError::Store(_) => None,
        }
    }
}

/// Validation failures inside a store error are still user input
/// problems; everything else stays a store failure.
impl From<StoreError> for BindError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => BindError::Validation(err),
            other => BindError::Store(other),
        }
    }
}

/// Convenience type alias for Results with BindError.
pub type BindResult<T> = Result<T, BindError>;

// =============================================================================
// Unit Tests
// =============================================================================
