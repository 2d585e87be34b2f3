//! # Validation Module
//!
//! Everything between raw user input and a record the store will accept.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Registration (once, at bootstrap)                            │
//! │  ├── validate_identifier: names safe to splice into SQL               │
//! │  └── registry checks: duplicates, references, reserved names           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form boundary (every submission)                             │
//! │  └── parse_value: raw entry text → typed Value, per field             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store boundary (every write)                                 │
//! │  ├── prepare_insert: fill defaults, reject missing required fields     │
//! │  └── prepare_update: check the fields actually being written           │
//! │                                                                         │
//! │  A failure at any layer is a ValidationError naming the field,         │
//! │  and nothing reaches the database.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{SchemaError, SchemaResult, ValidationError, ValidationResult};
use crate::record::Record;
use crate::types::{EntityDefinition, FieldDefinition, FieldType, Value};
use crate::{ID_FIELD, MAX_IDENTIFIER_LEN};

// =============================================================================
// Identifier Validation
// =============================================================================

/// Validates an entity or field name for use as an SQL identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_IDENTIFIER_LEN`] characters
/// - ASCII letters, digits, and underscores only
/// - Must not start with a digit
///
/// Identifiers are still quoted when spliced into SQL (entity names like
/// `order` are keywords), but this check is what makes the splice safe.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::validate_identifier;
///
/// assert!(validate_identifier("sale_date").is_ok());
/// assert!(validate_identifier("1st_choice").is_err());
/// assert!(validate_identifier("drop table").is_err());
/// ```
pub fn validate_identifier(name: &str) -> SchemaResult<()> {
    if name.is_empty() {
        return Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            reason: format!("must be at most {} characters", MAX_IDENTIFIER_LEN),
        });
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            reason: "must contain only ASCII letters, digits, and underscores".to_string(),
        });
    }

    if name.as_bytes()[0].is_ascii_digit() {
        return Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
            reason: "must not start with a digit".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Raw Text Parsing
// =============================================================================

/// Parses one raw entry string against a field definition.
///
/// Input is trimmed first. An empty string becomes `Null` for nullable
/// fields and `Required` otherwise; defaults are not applied here, that
/// is the form layer's call to make.
///
/// ## Example
/// ```rust
/// use kiosk_core::types::{FieldDefinition, Value};
/// use kiosk_core::validation::parse_value;
///
/// let quantity = FieldDefinition::integer("quantity");
/// assert_eq!(parse_value(&quantity, " 40 ").unwrap(), Value::Integer(40));
/// assert!(parse_value(&quantity, "forty").is_err());
/// assert!(parse_value(&quantity, "").is_err());
/// ```
pub fn parse_value(field: &FieldDefinition, raw: &str) -> ValidationResult<Value> {
    let raw = raw.trim();

    if raw.is_empty() {
        if field.nullable {
            return Ok(Value::Null);
        }
        return Err(ValidationError::Required {
            field: field.name.clone(),
        });
    }

    match field.field_type {
        FieldType::Integer => raw
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.name.clone(),
                reason: "must be a whole number".to_string(),
            }),
        FieldType::Real => raw
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.name.clone(),
                reason: "must be a number".to_string(),
            }),
        FieldType::Text => Ok(Value::Text(raw.to_string())),
        FieldType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.name.clone(),
                reason: "must be a date in YYYY-MM-DD format".to_string(),
            }),
    }
}

// =============================================================================
// Record Preparation
// =============================================================================

/// Validates a record for insert and completes it to the full column set.
///
/// ## What This Does
/// 1. Rejects `id` and undeclared field names
/// 2. Type-checks every provided value (explicit nulls included)
/// 3. Fills declared defaults for omitted fields (`today` resolves the
///    `Today` default)
/// 4. Omitted nullable fields become explicit `Null`
/// 5. Omitted required fields without a default are an error
///
/// The result carries every declared field exactly once, in no particular
/// order; the store reads it back in definition order.
pub fn prepare_insert(
    entity: &EntityDefinition,
    values: &Record,
    today: NaiveDate,
) -> ValidationResult<Record> {
    check_fields_known(entity, values)?;

    let mut complete = Record::new();
    for field in &entity.fields {
        match values.get(&field.name) {
            Some(value) => {
                check_value(field, value)?;
                complete.insert(field.name.clone(), value.clone());
            }
            None => {
                if let Some(default) = &field.default {
                    complete.insert(field.name.clone(), default.resolve(today));
                } else if field.nullable {
                    complete.insert(field.name.clone(), Value::Null);
                } else {
                    return Err(ValidationError::Required {
                        field: field.name.clone(),
                    });
                }
            }
        }
    }

    Ok(complete)
}

/// Validates a record for a partial update.
///
/// Only the fields present in `values` are checked and returned; omitted
/// fields keep their stored values. An empty result is legal and the
/// store treats it as an existence probe.
pub fn prepare_update(entity: &EntityDefinition, values: &Record) -> ValidationResult<Record> {
    check_fields_known(entity, values)?;

    let mut prepared = Record::new();
    for field in &entity.fields {
        if let Some(value) = values.get(&field.name) {
            check_value(field, value)?;
            prepared.insert(field.name.clone(), value.clone());
        }
    }

    Ok(prepared)
}

/// Rejects writes to `id` and to fields the entity does not declare.
fn check_fields_known(entity: &EntityDefinition, values: &Record) -> ValidationResult<()> {
    for (name, _) in values.iter() {
        if name == ID_FIELD {
            return Err(ValidationError::ReadOnly {
                field: ID_FIELD.to_string(),
            });
        }
        if entity.get_field(name).is_none() {
            return Err(ValidationError::UnknownField {
                entity: entity.name.clone(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Checks one typed value against its field definition.
fn check_value(field: &FieldDefinition, value: &Value) -> ValidationResult<()> {
    if value.is_null() {
        if field.nullable {
            return Ok(());
        }
        return Err(ValidationError::NotNull {
            field: field.name.clone(),
        });
    }

    if !value.matches_type(field.field_type) {
        return Err(ValidationError::TypeMismatch {
            field: field.name.clone(),
            expected: field.field_type,
            found: value.kind(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDefinition;

    fn flowers() -> EntityDefinition {
        EntityDefinition::new("flowers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::integer("quantity").default_value(0))
            .field(FieldDefinition::real("price"))
            .field(FieldDefinition::integer("supplier_id").nullable())
            .field(FieldDefinition::date("added_on").default_today())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("flowers").is_ok());
        assert!(validate_identifier("sale_date").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("order2").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("has space").is_err());
        assert!(validate_identifier("semi;colon").is_err());
        assert!(validate_identifier("quo\"te").is_err());
        assert!(validate_identifier(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_parse_value_by_type() {
        let entity = flowers();

        let quantity = entity.get_field("quantity").unwrap();
        assert_eq!(parse_value(quantity, "40").unwrap(), Value::Integer(40));
        assert!(parse_value(quantity, "12.5").is_err());

        let price = entity.get_field("price").unwrap();
        assert_eq!(parse_value(price, "12.5").unwrap(), Value::Real(12.5));
        assert_eq!(parse_value(price, "12").unwrap(), Value::Real(12.0));
        assert!(parse_value(price, "abc").is_err());

        let name = entity.get_field("name").unwrap();
        assert_eq!(
            parse_value(name, "  Roses  ").unwrap(),
            Value::Text("Roses".to_string())
        );

        let added = entity.get_field("added_on").unwrap();
        assert_eq!(
            parse_value(added, "2024-01-31").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert!(parse_value(added, "31/01/2024").is_err());
    }

    #[test]
    fn test_parse_value_empty() {
        let entity = flowers();

        // Required field: empty is an error naming the field.
        let err = parse_value(entity.get_field("name").unwrap(), "   ").unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "name"));

        // Nullable field: empty becomes Null.
        let supplier = entity.get_field("supplier_id").unwrap();
        assert_eq!(parse_value(supplier, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_prepare_insert_fills_defaults() {
        let entity = flowers();
        let values = Record::new().set("name", "Roses").set("price", 12.5);

        let complete = prepare_insert(&entity, &values, today()).unwrap();

        assert_eq!(complete.get("quantity"), Some(&Value::Integer(0)));
        assert_eq!(complete.get("added_on"), Some(&Value::Date(today())));
        assert_eq!(complete.get("supplier_id"), Some(&Value::Null));
        assert_eq!(complete.len(), entity.fields.len());
    }

    #[test]
    fn test_prepare_insert_missing_required() {
        let entity = flowers();
        let values = Record::new().set("name", "Roses"); // no price

        let err = prepare_insert(&entity, &values, today()).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "price"));
    }

    #[test]
    fn test_prepare_insert_rejects_unknown_and_id() {
        let entity = flowers();

        let unknown = Record::new().set("name", "Roses").set("color", "red");
        assert!(matches!(
            prepare_insert(&entity, &unknown, today()).unwrap_err(),
            ValidationError::UnknownField { .. }
        ));

        let with_id = Record::new().set("id", 3).set("name", "Roses");
        assert!(matches!(
            prepare_insert(&entity, &with_id, today()).unwrap_err(),
            ValidationError::ReadOnly { .. }
        ));
    }

    #[test]
    fn test_prepare_insert_explicit_null() {
        let entity = flowers();

        // Explicit null on a nullable field is kept, not defaulted.
        let ok = Record::new()
            .set("name", "Roses")
            .set("price", 1.0)
            .set("supplier_id", Value::Null);
        let complete = prepare_insert(&entity, &ok, today()).unwrap();
        assert_eq!(complete.get("supplier_id"), Some(&Value::Null));

        // Explicit null on a required field is rejected.
        let bad = Record::new()
            .set("name", Value::Null)
            .set("price", 1.0);
        assert!(matches!(
            prepare_insert(&entity, &bad, today()).unwrap_err(),
            ValidationError::NotNull { .. }
        ));
    }

    #[test]
    fn test_prepare_insert_type_mismatch() {
        let entity = flowers();
        let values = Record::new()
            .set("name", "Roses")
            .set("price", "expensive"); // text into a real field

        let err = prepare_insert(&entity, &values, today()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TypeMismatch {
                expected: FieldType::Real,
                ..
            }
        ));
    }

    #[test]
    fn test_prepare_update_is_partial() {
        let entity = flowers();
        let values = Record::new().set("quantity", 99);

        let prepared = prepare_update(&entity, &values).unwrap();
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared.get("quantity"), Some(&Value::Integer(99)));

        // Empty update is legal; the store decides what it means.
        let empty = prepare_update(&entity, &Record::new()).unwrap();
        assert!(empty.is_empty());
    }
}
