//! # Schema Registry
//!
//! Holds every entity definition an application runs with.
//!
//! ## Bootstrap Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Registry Bootstrap                                 │
//! │                                                                         │
//! │  App startup (definitions from code or a config file)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  registry.register(suppliers)   ← targets first                        │
//! │  registry.register(flowers)     ← may reference suppliers              │
//! │  registry.register(sales)       ← may reference flowers                │
//! │       │                                                                 │
//! │       ├── duplicate name?        → DuplicateEntity (abort startup)     │
//! │       ├── bad identifier?        → InvalidIdentifier                   │
//! │       ├── unknown target?        → UnknownReference                    │
//! │       └── OK → definition frozen                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(registry, ...)     ← registry is read-only from here on   │
//! │                                                                         │
//! │  Registration order is preserved: it drives CREATE TABLE order and     │
//! │  guarantees reference targets exist before their referrers.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::{SchemaError, SchemaResult};
use crate::types::{EntityDefinition, FieldType};
use crate::validation::validate_identifier;
use crate::ID_FIELD;

// =============================================================================
// Schema Registry
// =============================================================================

/// The set of registered entities, in registration order.
///
/// ## Example
/// ```rust
/// use kiosk_core::registry::SchemaRegistry;
/// use kiosk_core::types::{EntityDefinition, FieldDefinition};
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(EntityDefinition::new("suppliers").field(FieldDefinition::text("name")))
///     .unwrap();
///
/// assert!(registry.get("suppliers").is_ok());
/// assert!(registry.get("flowers").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Definitions in registration order.
    entities: Vec<EntityDefinition>,
    /// Exact-name lookup into `entities`.
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Builds a registry from a list of definitions, registering them in
    /// order. This is the entry point for schema-as-configuration: parse
    /// a `Vec<EntityDefinition>` from JSON, then hand it here.
    pub fn from_entities(entities: Vec<EntityDefinition>) -> SchemaResult<Self> {
        let mut registry = SchemaRegistry::new();
        for entity in entities {
            registry.register(entity)?;
        }
        Ok(registry)
    }

    /// Registers one entity definition.
    ///
    /// ## What Gets Checked
    /// - Entity name is a valid identifier and not already taken
    ///   (case-insensitively: SQLite treats `Flowers` and `flowers` as
    ///   the same table)
    /// - Field names are valid identifiers, unique within the entity,
    ///   and none of them is the reserved `id`
    /// - Every reference points at an already-registered entity and an
    ///   existing field of it, with a matching field type
    ///
    /// ## Errors
    /// Any [`SchemaError`]; the registry is unchanged on failure.
    pub fn register(&mut self, entity: EntityDefinition) -> SchemaResult<()> {
        validate_identifier(&entity.name)?;

        if self
            .entities
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(&entity.name))
        {
            return Err(SchemaError::DuplicateEntity(entity.name));
        }

        let mut seen = HashSet::new();
        for field in &entity.fields {
            if field.name.eq_ignore_ascii_case(ID_FIELD) {
                return Err(SchemaError::ReservedField(entity.name.clone()));
            }

            validate_identifier(&field.name)?;

            if !seen.insert(field.name.to_ascii_lowercase()) {
                return Err(SchemaError::DuplicateField {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                });
            }

            if let Some(reference) = &field.references {
                self.check_reference(&entity.name, &field.name, field.field_type, reference)?;
            }
        }

        self.index.insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Validates one reference declaration against what is already
    /// registered. Targets must come first, so cycles (including
    /// self-references) cannot be declared.
    fn check_reference(
        &self,
        entity: &str,
        field: &str,
        field_type: FieldType,
        reference: &crate::types::Reference,
    ) -> SchemaResult<()> {
        let target = match self.index.get(&reference.entity) {
            Some(idx) => &self.entities[*idx],
            None => {
                return Err(SchemaError::UnknownReference {
                    entity: entity.to_string(),
                    target: reference.entity.clone(),
                })
            }
        };

        let expected = if reference.field == ID_FIELD {
            FieldType::Integer
        } else {
            match target.get_field(&reference.field) {
                Some(target_field) => target_field.field_type,
                None => {
                    return Err(SchemaError::UnknownReferenceField {
                        entity: entity.to_string(),
                        target: reference.entity.clone(),
                        field: reference.field.clone(),
                    })
                }
            }
        };

        if field_type != expected {
            return Err(SchemaError::ReferenceTypeMismatch {
                entity: entity.to_string(),
                field: field.to_string(),
                target: reference.entity.clone(),
                target_field: reference.field.clone(),
                expected,
            });
        }

        Ok(())
    }

    /// Looks up an entity definition by exact name.
    pub fn get(&self, name: &str) -> SchemaResult<&EntityDefinition> {
        self.index
            .get(name)
            .map(|idx| &self.entities[*idx])
            .ok_or_else(|| SchemaError::EntityNotFound(name.to_string()))
    }

    /// Checks whether an entity is registered under this exact name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates definitions in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDefinition> {
        self.entities.iter()
    }

    /// Iterates entity names in registration order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.name.as_str())
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
