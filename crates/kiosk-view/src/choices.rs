//! # Reference Choices
//!
//! Dropdown support for reference fields: list a referenced entity as
//! `"{id} - {label}"` strings and parse the selected string back to an
//! id. The id travels inside the display string, so no widget-side
//! lookup table is needed.

use std::fmt;

use kiosk_core::{ValidationError, ID_FIELD};
use kiosk_db::{Filter, Order, Store, StoreError};

use crate::error::{BindError, BindResult};

/// Separates the id from the label in a rendered choice.
const SEPARATOR: &str = " - ";

// =============================================================================
// Choice
// =============================================================================

/// One selectable row of a referenced entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// The referenced row's id.
    pub id: i64,

    /// The display label (one designated field of the row).
    pub label: String,
}

/// Renders the dropdown string, `"3 - Roses"`.
impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, SEPARATOR, self.label)
    }
}

/// Parses a selected choice string back to its id.
///
/// Accepts anything [`Choice`]'s `Display` produced, and tolerates a
/// label-less plain id. Returns `None` for text that doesn't start with
/// an id, such as a prompt placeholder.
pub fn selected_id(text: &str) -> Option<i64> {
    let id_part = match text.split_once(SEPARATOR) {
        Some((id, _)) => id,
        None => text,
    };
    id_part.trim().parse().ok()
}

// =============================================================================
// Listing
// =============================================================================

/// Lists a referenced entity as choices, ordered by id.
///
/// `label_field` must be a declared field of `entity`; its value is
/// rendered with `Display` (a `Null` label renders empty).
///
/// ## Example
/// ```rust,ignore
/// let choices = reference_choices(&store, "suppliers", "name").await?;
/// // "1 - Garden Co", "2 - Bloom Ltd", ...
/// ```
pub async fn reference_choices(
    store: &Store,
    entity: &str,
    label_field: &str,
) -> BindResult<Vec<Choice>> {
    let definition = store.registry().get(entity).map_err(StoreError::from)?;
    if definition.get_field(label_field).is_none() {
        return Err(BindError::Validation(ValidationError::UnknownField {
            entity: definition.name.clone(),
            field: label_field.to_string(),
        }));
    }

    let listing = store.query(entity, &Filter::new(), Some(Order::asc(ID_FIELD)))?;
    let records = listing.fetch_all().await?;

    let mut choices = Vec::with_capacity(records.len());
    for record in records {
        let id = record
            .id()
            .ok_or_else(|| StoreError::Storage("fetched row carries no id".to_string()))?;
        let label = match record.get(label_field) {
            Some(value) => value.to_string(),
            None => String::new(),
        };
        choices.push(Choice { id, label });
    }
    Ok(choices)
}

// =============================================================================
// Unit Tests
// =============================================================================
