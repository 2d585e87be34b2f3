//! # Error Types
//!
//! Domain-specific error types for kiosk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kiosk-core errors (this file)                                         │
//! │  ├── SchemaError      - Registry bootstrap failures (fatal)            │
//! │  └── ValidationError  - Per-record input failures (recoverable)        │
//! │                                                                         │
//! │  kiosk-db errors (separate crate)                                      │
//! │  └── StoreError       - Storage operation failures                     │
//! │                                                                         │
//! │  kiosk-view errors (separate crate)                                    │
//! │  └── BindError        - What the widget layer sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → BindError → Widget message       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity name, field name)
//! 3. Errors are enum variants, never String
//! 4. ValidationError maps 1:1 to a message the form layer can show

use thiserror::Error;

use crate::types::FieldType;

// =============================================================================
// Schema Error
// =============================================================================

/// Registry bootstrap errors.
///
/// These occur while entity definitions are being registered, before any
/// row exists. A SchemaError means the application configuration is wrong
/// and startup should abort; there is nothing a user can correct at runtime.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An entity with this name was already registered.
    #[error("entity '{0}' is already registered")]
    DuplicateEntity(String),

    /// No entity with this name is registered.
    #[error("entity '{0}' is not registered")]
    EntityNotFound(String),

    /// The same field name appears twice in one entity definition.
    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    /// `id` is implicit on every entity and cannot be declared.
    #[error("entity '{0}' declares 'id', which is reserved for the primary key")]
    ReservedField(String),

    /// Entity or field name is not usable as an identifier.
    ///
    /// ## When This Occurs
    /// - Empty name
    /// - Name longer than [`crate::MAX_IDENTIFIER_LEN`]
    /// - Characters outside ASCII letters, digits, underscore
    /// - Leading digit
    #[error("'{name}' is not a valid identifier: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// A field references an entity that is not registered yet.
    ///
    /// Targets must be registered before their referrers, which also rules
    /// out self-references and cycles.
    #[error("entity '{entity}' references unknown entity '{target}'")]
    UnknownReference { entity: String, target: String },

    /// A field references a target field that the target does not declare.
    #[error("entity '{entity}' references '{target}.{field}', which is not declared")]
    UnknownReferenceField {
        entity: String,
        target: String,
        field: String,
    },

    /// A reference field's type does not match the field it points at.
    #[error("{entity}.{field} must be {expected} to reference {target}.{target_field}")]
    ReferenceTypeMismatch {
        entity: String,
        field: String,
        target: String,
        target_field: String,
        expected: FieldType,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Per-record input validation errors.
///
/// These occur when a record or a raw form value doesn't meet the entity
/// definition. They are recoverable: the form layer shows the message and
/// the user fixes the field. Nothing is written to storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Explicit null written to a non-nullable field.
    #[error("{field} must not be null")]
    NotNull { field: String },

    /// The record names a field the entity does not declare.
    #[error("{entity} has no field named '{field}'")]
    UnknownField { entity: String, field: String },

    /// Typed value does not match the declared field type.
    #[error("{field} must be {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    /// Raw text could not be parsed into the declared field type.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The field is maintained by the store and cannot be written.
    #[error("{field} is assigned by the store and cannot be set")]
    ReadOnly { field: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with SchemaError.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_messages() {
        let err = SchemaError::DuplicateEntity("flowers".to_string());
        assert_eq!(err.to_string(), "entity 'flowers' is already registered");

        let err = SchemaError::UnknownReference {
            entity: "sales".to_string(),
            target: "flowerz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "entity 'sales' references unknown entity 'flowerz'"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TypeMismatch {
            field: "price".to_string(),
            expected: FieldType::Real,
            found: "text",
        };
        assert_eq!(err.to_string(), "price must be real, got text");
    }

    #[test]
    fn test_reference_type_mismatch_message() {
        let err = SchemaError::ReferenceTypeMismatch {
            entity: "sales".to_string(),
            field: "flower_id".to_string(),
            target: "flowers".to_string(),
            target_field: "id".to_string(),
            expected: FieldType::Integer,
        };
        assert_eq!(
            err.to_string(),
            "sales.flower_id must be integer to reference flowers.id"
        );
    }
}
