//! # Schema Types
//!
//! The declarative model every kiosk application is configured with.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Declarative Schema                                │
//! │                                                                         │
//! │  ┌──────────────────┐      ┌────────────────────┐                      │
//! │  │ EntityDefinition │ 1..n │  FieldDefinition   │                      │
//! │  │  ──────────────  │─────►│  ────────────────  │                      │
//! │  │  name            │      │  name              │                      │
//! │  │  fields (ordered)│      │  field_type        │                      │
//! │  └──────────────────┘      │  nullable          │                      │
//! │                            │  default           │──► DefaultSpec      │
//! │  implicit on every entity: │  references        │──► Reference        │
//! │  id INTEGER PRIMARY KEY    └────────────────────┘                      │
//! │     AUTOINCREMENT                                                       │
//! │                                                                         │
//! │  ┌──────────────────┐      ┌────────────────────┐                      │
//! │  │    FieldType     │      │       Value        │                      │
//! │  │  ──────────────  │      │  ────────────────  │                      │
//! │  │  Integer         │      │  Integer(i64)      │                      │
//! │  │  Real            │      │  Real(f64)         │                      │
//! │  │  Text            │      │  Text(String)      │                      │
//! │  │  Date            │      │  Date(NaiveDate)   │                      │
//! │  └──────────────────┘      │  Null              │                      │
//! │                            └────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schema As Configuration
//! Every type here derives `Serialize`/`Deserialize`, so a whole business
//! domain (flower shop, bakery, gym, ...) is a data file, not code. One
//! engine serves all of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Field Type
// =============================================================================

/// The storage type of a field.
///
/// Deliberately small: these four cover every column the supported
/// applications use. `Date` is a calendar date (no time component),
/// carried as [`chrono::NaiveDate`] and stored as ISO-8601 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Real,
    /// UTF-8 string.
    Text,
    /// Calendar date (YYYY-MM-DD).
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Date => "date",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A single typed cell value.
///
/// ## Example
/// ```rust
/// use kiosk_core::types::Value;
///
/// let price: Value = 12.5.into();
/// assert_eq!(price.kind(), "real");
/// assert_eq!(price.to_string(), "12.5");
/// assert_eq!(Value::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Null,
}

impl Value {
    /// Returns the kind name, used in mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Null => "null",
        }
    }

    /// Checks whether this value fits the given field type.
    ///
    /// `Null` fits nothing here; nullability is a separate check because
    /// it depends on the field definition, not the type.
    pub fn matches_type(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (Value::Integer(_), FieldType::Integer)
                | (Value::Real(_), FieldType::Real)
                | (Value::Text(_), FieldType::Text)
                | (Value::Date(_), FieldType::Date)
        )
    }

    /// Checks if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the integer content, if any.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float content, if any.
    #[inline]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string content, if any.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date content, if any.
    #[inline]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Renders the value the way a table cell or entry widget would show it.
/// Null renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// =============================================================================
// Reference
// =============================================================================

/// A foreign-key declaration: this field holds values of `entity.field`.
///
/// Referential consistency is checked by the store at insert/update time;
/// it is not enforced by the database file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Target entity name.
    pub entity: String,
    /// Target field name, almost always `id`.
    pub field: String,
}

// =============================================================================
// Default Spec
// =============================================================================

/// Declares what an omitted field receives at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSpec {
    /// A fixed literal.
    Value(Value),
    /// The current calendar date at insert time.
    Today,
}

impl DefaultSpec {
    /// Resolves the default to a concrete value.
    ///
    /// The caller provides `today` so this stays pure; the store passes
    /// the clock in, tests pass a fixed date.
    pub fn resolve(&self, today: NaiveDate) -> Value {
        match self {
            DefaultSpec::Value(v) => v.clone(),
            DefaultSpec::Today => Value::Date(today),
        }
    }
}

// =============================================================================
// Field Definition
// =============================================================================

/// One declared column of an entity.
///
/// Built fluently:
/// ```rust
/// use kiosk_core::types::FieldDefinition;
///
/// let supplier = FieldDefinition::integer("supplier_id")
///     .nullable()
///     .references("suppliers", "id");
///
/// assert!(supplier.nullable);
/// assert!(supplier.references.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Column name. Validated as an identifier at registration.
    pub name: String,

    /// Storage type.
    pub field_type: FieldType,

    /// Whether the column accepts NULL. Default: required.
    #[serde(default)]
    pub nullable: bool,

    /// Value an omitted field receives at insert time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSpec>,

    /// Foreign-key declaration, if this field points at another entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Reference>,
}

impl FieldDefinition {
    /// Creates a required field with no default and no reference.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDefinition {
            name: name.into(),
            field_type,
            nullable: false,
            default: None,
            references: None,
        }
    }

    /// Shorthand for an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        FieldDefinition::new(name, FieldType::Integer)
    }

    /// Shorthand for a real (float) field.
    pub fn real(name: impl Into<String>) -> Self {
        FieldDefinition::new(name, FieldType::Real)
    }

    /// Shorthand for a text field.
    pub fn text(name: impl Into<String>) -> Self {
        FieldDefinition::new(name, FieldType::Text)
    }

    /// Shorthand for a date field.
    pub fn date(name: impl Into<String>) -> Self {
        FieldDefinition::new(name, FieldType::Date)
    }

    /// Marks the field as accepting NULL.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets a literal default for omitted inserts.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSpec::Value(value.into()));
        self
    }

    /// Sets "today's date" as the default for omitted inserts.
    pub fn default_today(mut self) -> Self {
        self.default = Some(DefaultSpec::Today);
        self
    }

    /// Declares this field as a foreign key to `entity.field`.
    pub fn references(mut self, entity: impl Into<String>, field: impl Into<String>) -> Self {
        self.references = Some(Reference {
            entity: entity.into(),
            field: field.into(),
        });
        self
    }
}

// =============================================================================
// Entity Definition
// =============================================================================

/// A named entity: one table, one tab, one form.
///
/// Field order is preserved everywhere it is visible: DDL column order,
/// table headings, form traversal.
///
/// ## Example
/// ```rust
/// use kiosk_core::types::{EntityDefinition, FieldDefinition};
///
/// let flowers = EntityDefinition::new("flowers")
///     .field(FieldDefinition::text("name"))
///     .field(FieldDefinition::integer("quantity").default_value(0))
///     .field(FieldDefinition::real("price"));
///
/// assert_eq!(flowers.fields.len(), 3);
/// assert!(flowers.get_field("price").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity name, also the table name.
    pub name: String,

    /// Declared fields, in declaration order. Never includes `id`.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl EntityDefinition {
    /// Creates an entity with no declared fields yet.
    pub fn new(name: impl Into<String>) -> Self {
        EntityDefinition {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a declared field by name. `id` is not declared and
    /// returns None here.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Real(12.5).to_string(), "12.5");
        assert_eq!(Value::Text("Roses".to_string()).to_string(), "Roses");
        assert_eq!(Value::Null.to_string(), "");

        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-01-31");
    }

    #[test]
    fn test_value_matches_type() {
        assert!(Value::Integer(1).matches_type(FieldType::Integer));
        assert!(Value::Real(1.0).matches_type(FieldType::Real));
        assert!(!Value::Integer(1).matches_type(FieldType::Real));
        assert!(!Value::Null.matches_type(FieldType::Text));
    }

    #[test]
    fn test_value_from_option() {
        let some: Value = Some(7i64).into();
        assert_eq!(some, Value::Integer(7));

        let none: Value = Option::<i64>::None.into();
        assert!(none.is_null());
    }

    #[test]
    fn test_default_spec_resolve() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let fixed = DefaultSpec::Value(Value::Integer(0));
        assert_eq!(fixed.resolve(today), Value::Integer(0));

        let dynamic = DefaultSpec::Today;
        assert_eq!(dynamic.resolve(today), Value::Date(today));
    }

    #[test]
    fn test_field_builder() {
        let field = FieldDefinition::integer("supplier_id")
            .nullable()
            .references("suppliers", "id");

        assert_eq!(field.name, "supplier_id");
        assert_eq!(field.field_type, FieldType::Integer);
        assert!(field.nullable);

        let reference = field.references.unwrap();
        assert_eq!(reference.entity, "suppliers");
        assert_eq!(reference.field, "id");
    }

    #[test]
    fn test_entity_field_order_preserved() {
        let entity = EntityDefinition::new("flowers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::integer("quantity"))
            .field(FieldDefinition::real("price"));

        let names: Vec<&str> = entity.field_names().collect();
        assert_eq!(names, vec!["name", "quantity", "price"]);
    }

    #[test]
    fn test_definitions_roundtrip_through_json() {
        let entity = EntityDefinition::new("sales")
            .field(FieldDefinition::integer("flower_id").references("flowers", "id"))
            .field(FieldDefinition::date("sale_date").default_today());

        let json = serde_json::to_string(&entity).unwrap();
        let back: EntityDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity);
    }
}
