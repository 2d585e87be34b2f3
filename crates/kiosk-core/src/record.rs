//! # Record
//!
//! A row as the rest of the system sees it: field name to typed value.
//!
//! The store returns complete records (every declared field present, plus
//! `id`); callers build partial records for inserts and updates. A
//! `BTreeMap` keeps iteration deterministic; display order comes from the
//! entity definition, not from the record itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Value;
use crate::ID_FIELD;

/// A single row, keyed by field name.
///
/// ## Example
/// ```rust
/// use kiosk_core::record::Record;
/// use kiosk_core::types::Value;
///
/// let record = Record::new()
///     .set("name", "Roses")
///     .set("quantity", 40)
///     .set("price", 12.5);
///
/// assert_eq!(record.get("name"), Some(&Value::Text("Roses".to_string())));
/// assert_eq!(record.len(), 3);
/// assert_eq!(record.id(), None); // the store assigns ids
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record {
            values: BTreeMap::new(),
        }
    }

    /// Sets a field, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Sets a field in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns the assigned primary key, if this record came out of the
    /// store.
    pub fn id(&self) -> Option<i64> {
        self.values.get(ID_FIELD).and_then(Value::as_integer)
    }

    /// Checks whether the record carries this field.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no fields are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates field names in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            values: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
