//! # Schema Bootstrap
//!
//! Turns registered entity definitions into `CREATE TABLE` statements and
//! applies them on open.
//!
//! ## DDL Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EntityDefinition("flowers")            generated DDL                   │
//! │    text    "name"                ──►    CREATE TABLE IF NOT EXISTS      │
//! │    integer "quantity" default 0         "flowers" (                     │
//! │    real    "price"                        id INTEGER PRIMARY KEY        │
//! │    integer "supplier_id" nullable            AUTOINCREMENT,             │
//! │              → suppliers.id               "name" TEXT NOT NULL,         │
//! │                                           "quantity" INTEGER NOT NULL   │
//! │                                               DEFAULT 0,                │
//! │                                           "price" REAL NOT NULL,        │
//! │                                           "supplier_id" INTEGER )       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CREATE TABLE IF NOT EXISTS` makes the pass idempotent and never
//! destructive: existing tables and rows are left exactly as they are,
//! even when the registered definition has drifted from the file. There
//! is no migration support.
//!
//! References deliberately produce no `FOREIGN KEY` clauses. The store
//! checks them itself at write time, so the database file never enforces
//! more than the engine does.

use sqlx::SqlitePool;
use tracing::{debug, info};

use kiosk_core::types::DefaultSpec;
use kiosk_core::{EntityDefinition, FieldType, SchemaRegistry, Value, ID_FIELD};

use crate::error::StoreResult;

// =============================================================================
// SQL Fragments
// =============================================================================

/// Quotes an identifier for splicing into SQL.
///
/// Names are validated at registration (ASCII word characters only), so
/// quoting here is about keywords: an entity named `order` is legal and
/// must render as `"order"`.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Maps a field type to its declared SQLite column type.
fn sql_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Integer => "INTEGER",
        FieldType::Real => "REAL",
        FieldType::Text => "TEXT",
        FieldType::Date => "DATE",
    }
}

/// Renders a default value as an SQL literal.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => x.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::Null => "NULL".to_string(),
    }
}

// =============================================================================
// DDL Generation
// =============================================================================

/// Builds the `CREATE TABLE IF NOT EXISTS` statement for one entity.
///
/// The `id INTEGER PRIMARY KEY AUTOINCREMENT` column is implicit on
/// every entity and always comes first; declared fields follow in
/// definition order.
pub(crate) fn create_table_sql(entity: &EntityDefinition) -> String {
    let mut columns = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", ID_FIELD)];

    for field in &entity.fields {
        let mut column = format!("{} {}", quote_ident(&field.name), sql_type(field.field_type));

        if !field.nullable {
            column.push_str(" NOT NULL");
        }

        match &field.default {
            Some(DefaultSpec::Value(value)) => {
                column.push_str(" DEFAULT ");
                column.push_str(&sql_literal(value));
            }
            Some(DefaultSpec::Today) => column.push_str(" DEFAULT CURRENT_DATE"),
            None => {}
        }

        columns.push(column);
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&entity.name),
        columns.join(", ")
    )
}

/// Creates every registered table that does not exist yet, in
/// registration order.
pub(crate) async fn ensure_schema(pool: &SqlitePool, registry: &SchemaRegistry) -> StoreResult<()> {
    info!(entities = registry.len(), "Ensuring schema");

    for entity in registry.entities() {
        let sql = create_table_sql(entity);
        debug!(entity = %entity.name, "Creating table if missing");
        sqlx::query(&sql).execute(pool).await?;
    }

    info!("Schema ready");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::FieldDefinition;

    #[test]
    fn test_create_table_sql() {
        let entity = EntityDefinition::new("flowers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::integer("quantity").default_value(0))
            .field(FieldDefinition::real("price"))
            .field(
                FieldDefinition::integer("supplier_id")
                    .nullable()
                    .references("suppliers", "id"),
            );

        let sql = create_table_sql(&entity);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"flowers\" (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"name\" TEXT NOT NULL, \
             \"quantity\" INTEGER NOT NULL DEFAULT 0, \
             \"price\" REAL NOT NULL, \
             \"supplier_id\" INTEGER)"
        );
    }

    #[test]
    fn test_keyword_entity_is_quoted() {
        // "order" is an SQL keyword but a perfectly legal entity name.
        let entity = EntityDefinition::new("order").field(FieldDefinition::text("status"));
        let sql = create_table_sql(&entity);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"order\""));
    }

    #[test]
    fn test_today_default_renders_current_date() {
        let entity =
            EntityDefinition::new("sales").field(FieldDefinition::date("sale_date").default_today());
        let sql = create_table_sql(&entity);
        assert!(sql.contains("\"sale_date\" DATE NOT NULL DEFAULT CURRENT_DATE"));
    }

    #[test]
    fn test_text_default_is_escaped() {
        let entity = EntityDefinition::new("notes")
            .field(FieldDefinition::text("status").default_value("it's new"));
        let sql = create_table_sql(&entity);
        assert!(sql.contains("DEFAULT 'it''s new'"));
    }
}
