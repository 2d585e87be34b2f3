//! # Form Input
//!
//! Raw text as a form collects it, and its conversion into typed
//! records. An empty entry means "not provided": inserts fall back to
//! the field's default, updates leave the stored value alone (or clear
//! it, when the field is nullable).

use kiosk_core::validation::parse_value;
use kiosk_core::{
    EntityDefinition, FieldDefinition, Record, ValidationError, ValidationResult, Value, ID_FIELD,
};

// =============================================================================
// Form Input
// =============================================================================

/// Ordered field-name/raw-text pairs, one per form entry.
///
/// Order is preserved so error reporting and logs follow the order the
/// form shows its entries in. Setting a field twice replaces the first
/// value, as re-typing into the same entry would.
///
/// ## Example
/// ```rust,ignore
/// let form = FormInput::new()
///     .set("name", "Rose")
///     .set("price", "2.50");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    entries: Vec<(String, String)>,
}

impl FormInput {
    /// Creates an empty form.
    pub fn new() -> Self {
        FormInput::default()
    }

    /// Sets one entry's text, replacing any earlier value for the field.
    pub fn set(mut self, field: impl Into<String>, raw: impl Into<String>) -> Self {
        let field = field.into();
        let raw = raw.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = raw,
            None => self.entries.push((field, raw)),
        }
        self
    }

    /// The raw text of one entry, if the field was set.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, raw)| raw.as_str())
    }

    /// Iterates entries in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.as_str()))
    }

    /// True when no entry was set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Checks one entry's field name against the entity.
fn declared_field<'a>(
    entity: &'a EntityDefinition,
    name: &str,
) -> ValidationResult<&'a FieldDefinition> {
    if name == ID_FIELD {
        return Err(ValidationError::ReadOnly {
            field: ID_FIELD.to_string(),
        });
    }
    entity
        .get_field(name)
        .ok_or_else(|| ValidationError::UnknownField {
            entity: entity.name.clone(),
            field: name.to_string(),
        })
}

/// Converts a form into an insert record.
///
/// Empty entries are dropped: the store then fills the field's default,
/// stores `Null` for nullable fields, and rejects missing required
/// fields, exactly as if the entry had not existed.
pub(crate) fn to_insert_record(
    entity: &EntityDefinition,
    form: &FormInput,
) -> ValidationResult<Record> {
    let mut record = Record::new();
    for (name, raw) in form.iter() {
        let field = declared_field(entity, name)?;
        if raw.trim().is_empty() {
            continue;
        }
        record.insert(field.name.clone(), parse_value(field, raw)?);
    }
    Ok(record)
}

/// Converts a form into a partial update record.
///
/// An empty entry clears a nullable field to `Null`; for a required
/// field it means "leave unchanged" and the field is dropped from the
/// update.
pub(crate) fn to_update_record(
    entity: &EntityDefinition,
    form: &FormInput,
) -> ValidationResult<Record> {
    let mut record = Record::new();
    for (name, raw) in form.iter() {
        let field = declared_field(entity, name)?;
        if raw.trim().is_empty() {
            if field.nullable {
                record.insert(field.name.clone(), Value::Null);
            }
            continue;
        }
        record.insert(field.name.clone(), parse_value(field, raw)?);
    }
    Ok(record)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kiosk_core::FieldDefinition;

    fn flowers() -> EntityDefinition {
        EntityDefinition::new("flowers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::integer("quantity").default_value(0))
            .field(FieldDefinition::real("price"))
            .field(FieldDefinition::text("note").nullable())
            .field(FieldDefinition::date("stocked_on").nullable())
    }

    #[test]
    fn test_set_replaces_earlier_entry() {
        let form = FormInput::new().set("name", "Rose").set("name", "Tulip");
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("name"), Some("Tulip"));
    }

    #[test]
    fn test_insert_record_parses_types() {
        let form = FormInput::new()
            .set("name", "Rose")
            .set("quantity", "12")
            .set("price", "2.50")
            .set("stocked_on", "2024-03-01");
        let record = to_insert_record(&flowers(), &form).unwrap();

        assert_eq!(record.get("name"), Some(&Value::Text("Rose".to_string())));
        assert_eq!(record.get("quantity"), Some(&Value::Integer(12)));
        assert_eq!(record.get("price"), Some(&Value::Real(2.5)));
        assert_eq!(
            record.get("stocked_on"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
    }

    #[test]
    fn test_insert_record_drops_empty_entries() {
        let form = FormInput::new()
            .set("name", "Rose")
            .set("quantity", "")
            .set("price", "2.50")
            .set("note", "   ");
        let record = to_insert_record(&flowers(), &form).unwrap();

        // The store fills the default / null for these
        assert!(record.get("quantity").is_none());
        assert!(record.get("note").is_none());
    }

    #[test]
    fn test_insert_record_rejects_bad_entries() {
        let err = to_insert_record(&flowers(), &FormInput::new().set("id", "5")).unwrap_err();
        assert!(matches!(err, ValidationError::ReadOnly { .. }));

        let err = to_insert_record(&flowers(), &FormInput::new().set("color", "red")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { .. }));

        let err =
            to_insert_record(&flowers(), &FormInput::new().set("price", "cheap")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        assert_eq!(
            err.to_string(),
            "price has invalid format: must be a number"
        );
    }

    #[test]
    fn test_update_record_empty_clears_or_preserves() {
        let form = FormInput::new()
            .set("name", "")
            .set("note", "")
            .set("price", "3.00");
        let record = to_update_record(&flowers(), &form).unwrap();

        // Required field left alone, nullable field cleared
        assert!(record.get("name").is_none());
        assert_eq!(record.get("note"), Some(&Value::Null));
        assert_eq!(record.get("price"), Some(&Value::Real(3.0)));
    }
}
