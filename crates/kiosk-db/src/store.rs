//! # Store
//!
//! The single entry point for everything persistent: pool management,
//! table bootstrap, and schema-driven CRUD over any registered entity.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store Write Path                               │
//! │                                                                         │
//! │  insert("sales", values)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  registry.get("sales") ← which fields, which types, which references   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare_insert ← pure: types checked, defaults filled (kiosk-core)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_references ← each reference value must hit an existing row      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO "sales" (...) VALUES (?, ...) ← generated, parameterized  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  last_insert_rowid() ← the new id                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commit Granularity
//! Every write is a single SQL statement and commits on its own. There is
//! no transaction API: a multi-step flow (record a sale, then adjust
//! stock) is a sequence of independent writes, and a crash between them
//! leaves the earlier writes committed. Flows that need that guarantee
//! keep their steps idempotent.
//!
//! ## Reference Checking
//! Reference fields are enforced by the store, not by SQLite. Tables are
//! created without FOREIGN KEY clauses and the `foreign_keys` pragma is
//! left off: an existence probe runs before each write instead, so a bad
//! reference fails as a typed [`StoreError::NotFound`] naming the target
//! entity rather than a bare constraint violation. Deletes are never
//! blocked by referrers.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use kiosk_core::validation::{prepare_insert, prepare_update};
use kiosk_core::{
    EntityDefinition, FieldType, Record, SchemaRegistry, Value, ValidationError, ID_FIELD,
};

use crate::bootstrap::{self, quote_ident};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::query::{
    bind_value, decode_record, decode_scalar, select_columns, select_sql, where_clause, Filter,
    Order, RecordQuery,
};
use crate::report::{self, FieldRef, GroupRow, Metric, ReportEngine};

// =============================================================================
// Store
// =============================================================================

/// Schema-driven SQLite store.
///
/// A `Store` is a connection pool plus the [`SchemaRegistry`] it was
/// opened with. Every operation takes the entity name as a string and is
/// checked against the registry before any SQL runs, so one store serves
/// every entity an application declares.
///
/// Cloning is cheap (pool handle + `Arc`); clones share the same
/// database and registry.
#[derive(Debug, Clone)]
pub struct Store {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// The entity definitions this store was opened with.
    registry: Arc<SchemaRegistry>,
}

impl Store {
    /// Opens a store: connects the pool and bootstraps missing tables.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    /// 3. Creates the connection pool
    /// 4. Creates a table per registered entity (if `config.bootstrap`)
    ///
    /// ## Arguments
    /// * `registry` - The validated entity definitions to serve
    /// * `config` - Pool and bootstrap settings
    ///
    /// ## Returns
    /// * `Ok(Store)` - Ready-to-use store
    /// * `Err(StoreError)` - Connection or bootstrap failed
    ///
    /// ## Example
    /// ```rust,ignore
    /// let store = Store::open(registry, StoreConfig::new("./shop.db")).await?;
    /// ```
    pub async fn open(registry: SchemaRegistry, config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            entities = registry.len(),
            "Opening store"
        );

        // sqlite://path creates the file if it doesn't exist
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the
            // last write on power failure
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Store pool created"
        );

        let store = Store {
            pool,
            registry: Arc::new(registry),
        };

        if config.bootstrap {
            store.ensure_schema().await?;
        }

        Ok(store)
    }

    /// Creates a table for every registered entity that doesn't have one.
    ///
    /// Idempotent: existing tables are left untouched, including tables
    /// whose columns have drifted from the current definitions.
    /// Automatically called by `open()` unless bootstrap was disabled in
    /// the config.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        bootstrap::ensure_schema(&self.pool, &self.registry).await
    }

    /// The entity definitions this store serves.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries the store doesn't generate. Prefer the typed
    /// operations when one fits.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Inserts a record and returns its assigned id.
    ///
    /// ## What This Does
    /// 1. Checks every value against the entity definition
    /// 2. Fills omitted fields from their declared defaults (`today` for
    ///    date defaults comes from the system clock, once, here)
    /// 3. Probes that every non-null reference value hits an existing row
    /// 4. Runs one INSERT and returns `last_insert_rowid()`
    ///
    /// ## Errors
    /// * [`StoreError::Validation`] - unknown field, type mismatch,
    ///   missing required field, or an explicit `id`
    /// * [`StoreError::NotFound`] - a reference value with no target row
    ///
    /// ## Example
    /// ```rust,ignore
    /// let id = store
    ///     .insert("flowers", &Record::new().set("name", "Rose").set("price", 2.5))
    ///     .await?;
    /// ```
    pub async fn insert(&self, entity: &str, values: &Record) -> StoreResult<i64> {
        let definition = self.registry.get(entity)?;
        let record = prepare_insert(definition, values, Utc::now().date_naive())?;
        self.check_references(definition, &record).await?;

        let mut columns = Vec::with_capacity(definition.fields.len());
        let mut placeholders = Vec::with_capacity(definition.fields.len());
        let mut params = Vec::with_capacity(definition.fields.len());
        for field in &definition.fields {
            columns.push(quote_ident(&field.name));
            placeholders.push("?");
            params.push(record.get(&field.name).cloned().unwrap_or(Value::Null));
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&definition.name))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(&definition.name),
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = bind_value(query, value);
        }
        let result = query.execute(&self.pool).await?;

        let id = result.last_insert_rowid();
        debug!(entity = %definition.name, id, "Inserted record");
        Ok(id)
    }

    /// Updates the given fields of one record, leaving the rest alone.
    ///
    /// Fields absent from `values` keep their stored values; defaults are
    /// not re-applied. An empty `values` changes nothing but still
    /// reports whether the row exists.
    ///
    /// ## Errors
    /// * [`StoreError::NotFound`] - no row with this id
    /// * [`StoreError::Validation`] - unknown field, type mismatch, or
    ///   null written to a non-nullable field
    pub async fn update(&self, entity: &str, id: i64, values: &Record) -> StoreResult<()> {
        let definition = self.registry.get(entity)?;
        let record = prepare_update(definition, values)?;

        if record.is_empty() {
            // Nothing to write; still report a missing row.
            if self.get(entity, id).await?.is_none() {
                return Err(StoreError::not_found(&definition.name, id));
            }
            return Ok(());
        }

        self.check_references(definition, &record).await?;

        let mut assignments = Vec::with_capacity(record.len());
        let mut params = Vec::with_capacity(record.len() + 1);
        for (name, value) in record.iter() {
            assignments.push(format!("{} = ?", quote_ident(name)));
            params.push(value.clone());
        }
        params.push(Value::Integer(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(&definition.name),
            assignments.join(", "),
            quote_ident(ID_FIELD)
        );

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = bind_value(query, value);
        }
        let result = query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(&definition.name, id));
        }

        debug!(entity = %definition.name, id, fields = record.len(), "Updated record");
        Ok(())
    }

    /// Writes a full record under a caller-chosen id, replacing any
    /// existing row with that id.
    ///
    /// Unlike [`update`](Store::update), this validates like an insert:
    /// every field is checked and omitted fields take their defaults, so
    /// the stored row is always complete.
    pub async fn upsert(&self, entity: &str, id: i64, values: &Record) -> StoreResult<()> {
        let definition = self.registry.get(entity)?;
        let record = prepare_insert(definition, values, Utc::now().date_naive())?;
        self.check_references(definition, &record).await?;

        let mut columns = vec![quote_ident(ID_FIELD)];
        let mut placeholders = vec!["?"];
        let mut params = Vec::with_capacity(definition.fields.len() + 1);
        params.push(Value::Integer(id));
        for field in &definition.fields {
            columns.push(quote_ident(&field.name));
            placeholders.push("?");
            params.push(record.get(&field.name).cloned().unwrap_or(Value::Null));
        }

        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            quote_ident(&definition.name),
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = bind_value(query, value);
        }
        query.execute(&self.pool).await?;

        debug!(entity = %definition.name, id, "Upserted record");
        Ok(())
    }

    /// Deletes one record. Returns whether a row was actually removed.
    ///
    /// Deleting an id that doesn't exist is a no-op, not an error, so
    /// delete flows can be retried blindly.
    pub async fn delete(&self, entity: &str, id: i64) -> StoreResult<bool> {
        let definition = self.registry.get(entity)?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(&definition.name),
            quote_ident(ID_FIELD)
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        let deleted = result.rows_affected() > 0;
        debug!(entity = %definition.name, id, deleted, "Deleted record");
        Ok(deleted)
    }

    /// Adds a signed delta to one numeric field in place.
    ///
    /// The canonical stock movement: `adjust("flowers", id, "quantity", 5)`
    /// after a purchase, a negative delta after a sale. A stored NULL
    /// counts as zero. The delta's type must match the field's type
    /// exactly.
    ///
    /// ## Errors
    /// * [`StoreError::NotFound`] - no row with this id
    /// * [`StoreError::Validation`] - unknown field, or the field/delta
    ///   is not numeric
    pub async fn adjust(
        &self,
        entity: &str,
        id: i64,
        field: &str,
        delta: Value,
    ) -> StoreResult<()> {
        let definition = self.registry.get(entity)?;
        let field_def = definition.get_field(field).ok_or_else(|| {
            StoreError::Validation(ValidationError::UnknownField {
                entity: definition.name.clone(),
                field: field.to_string(),
            })
        })?;

        let compatible = matches!(
            (field_def.field_type, &delta),
            (FieldType::Integer, Value::Integer(_)) | (FieldType::Real, Value::Real(_))
        );
        if !compatible {
            return Err(StoreError::Validation(ValidationError::TypeMismatch {
                field: field.to_string(),
                expected: field_def.field_type,
                found: delta.kind(),
            }));
        }

        let column = quote_ident(field);
        let sql = format!(
            "UPDATE {} SET {} = COALESCE({}, 0) + ? WHERE {} = ?",
            quote_ident(&definition.name),
            column,
            column,
            quote_ident(ID_FIELD)
        );

        let result = bind_value(sqlx::query(&sql), &delta)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(&definition.name, id));
        }

        debug!(entity = %definition.name, id, field, "Adjusted field");
        Ok(())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Fetches one record by id, or `None` if it doesn't exist.
    pub async fn get(&self, entity: &str, id: i64) -> StoreResult<Option<Record>> {
        let definition = self.registry.get(entity)?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            select_columns(definition),
            quote_ident(&definition.name),
            quote_ident(ID_FIELD)
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(decode_record(definition, &row)?)),
            None => Ok(None),
        }
    }

    /// Counts rows matching a filter. An empty filter counts the table.
    pub async fn count(&self, entity: &str, filter: &Filter) -> StoreResult<i64> {
        let definition = self.registry.get(entity)?;

        let mut params = Vec::new();
        let where_sql = where_clause(definition, filter, None, &mut params)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote_ident(&definition.name),
            where_sql
        );

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get(0)?)
    }

    /// Builds a restartable listing of an entity.
    ///
    /// Field names are validated and SQL is rendered here, once; the
    /// database is only touched by [`RecordQuery::fetch_all`]. The view
    /// layer holds one of these per screen and refetches it on every
    /// refresh.
    pub fn query(
        &self,
        entity: &str,
        filter: &Filter,
        order: Option<Order>,
    ) -> StoreResult<RecordQuery> {
        let definition = self.registry.get(entity)?;
        let (sql, params) = select_sql(definition, filter, order.as_ref())?;
        Ok(RecordQuery::new(
            self.pool.clone(),
            definition.clone(),
            sql,
            params,
        ))
    }

    /// Groups rows by a field (own or one reference hop away) and
    /// computes one metric per group.
    ///
    /// Groups come back ordered by metric descending; groups with equal
    /// metrics are ordered by the smallest contributing row id, so
    /// results are stable across runs.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // Best sellers: sale count per flower name
    /// let rows = store
    ///     .aggregate(
    ///         "sales",
    ///         &FieldRef::joined("flower_id", "name"),
    ///         &Metric::Count,
    ///         &Filter::new(),
    ///         Some(5),
    ///     )
    ///     .await?;
    /// ```
    pub async fn aggregate(
        &self,
        entity: &str,
        group_by: &FieldRef,
        metric: &Metric,
        filter: &Filter,
        limit: Option<u32>,
    ) -> StoreResult<Vec<GroupRow>> {
        let definition = self.registry.get(entity)?;
        let plan = report::aggregate_plan(&self.registry, definition, group_by, metric, filter, limit)?;

        debug!(entity = %definition.name, sql = %plan.sql, "Running aggregate");

        let mut query = sqlx::query(&plan.sql);
        for value in &plan.params {
            query = bind_value(query, value);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(GroupRow {
                    key: decode_scalar(row, 0, plan.key_type)?,
                    value: decode_scalar(row, 1, plan.value_type)?,
                })
            })
            .collect()
    }

    /// Returns the report engine over this store.
    pub fn reports(&self) -> ReportEngine {
        ReportEngine::new(self.clone())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Closes the connection pool. Further operations will fail.
    pub async fn close(&self) {
        info!("Closing store pool");
        self.pool.close().await;
    }

    /// Checks whether the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Probes that every non-null reference value in `record` points at
    /// an existing row. Runs before the write, so a dangling reference
    /// never reaches the table.
    async fn check_references(
        &self,
        definition: &EntityDefinition,
        record: &Record,
    ) -> StoreResult<()> {
        for field in &definition.fields {
            let Some(reference) = &field.references else {
                continue;
            };
            let Some(value) = record.get(&field.name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
                quote_ident(&reference.entity),
                quote_ident(&reference.field)
            );
            let row = bind_value(sqlx::query(&sql), value)
                .fetch_one(&self.pool)
                .await?;
            let exists: i64 = row.try_get(0)?;

            if exists == 0 {
                return Err(StoreError::not_found(&reference.entity, value));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::{FieldDefinition, SchemaError};

    /// Flower shop schema: the smallest shape that exercises defaults,
    /// nullable fields, references, and dates.
    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_entities(vec![
            EntityDefinition::new("suppliers")
                .field(FieldDefinition::text("name"))
                .field(FieldDefinition::text("contact").nullable()),
            EntityDefinition::new("flowers")
                .field(FieldDefinition::text("name"))
                .field(FieldDefinition::integer("quantity").default_value(0))
                .field(FieldDefinition::real("price"))
                .field(
                    FieldDefinition::integer("supplier_id")
                        .nullable()
                        .references("suppliers", "id"),
                ),
            EntityDefinition::new("sales")
                .field(FieldDefinition::integer("flower_id").references("flowers", "id"))
                .field(FieldDefinition::integer("quantity"))
                .field(FieldDefinition::real("total_price"))
                .field(FieldDefinition::date("sale_date").default_today()),
        ])
        .unwrap()
    }

    async fn test_store() -> Store {
        Store::open(registry(), StoreConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_and_health_check() {
        let store = test_store().await;
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = test_store().await;
        store.ensure_schema().await.unwrap();

        let id = store
            .insert("suppliers", &Record::new().set("name", "Garden Co"))
            .await
            .unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let store = test_store().await;

        let supplier = store
            .insert(
                "suppliers",
                &Record::new().set("name", "Garden Co").set("contact", "055-1234"),
            )
            .await
            .unwrap();
        let id = store
            .insert(
                "flowers",
                &Record::new()
                    .set("name", "Rose")
                    .set("quantity", 12)
                    .set("price", 2.5)
                    .set("supplier_id", supplier),
            )
            .await
            .unwrap();

        let record = store.get("flowers", id).await.unwrap().unwrap();
        assert_eq!(record.id(), Some(id));
        assert_eq!(record.get("name"), Some(&Value::Text("Rose".to_string())));
        assert_eq!(record.get("quantity"), Some(&Value::Integer(12)));
        assert_eq!(record.get("price"), Some(&Value::Real(2.5)));
        assert_eq!(record.get("supplier_id"), Some(&Value::Integer(supplier)));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = test_store().await;
        assert!(store.get("flowers", 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_fills_defaults() {
        let store = test_store().await;

        let flower = store
            .insert(
                "flowers",
                &Record::new().set("name", "Tulip").set("price", 1.75),
            )
            .await
            .unwrap();
        let record = store.get("flowers", flower).await.unwrap().unwrap();
        assert_eq!(record.get("quantity"), Some(&Value::Integer(0)));
        assert_eq!(record.get("supplier_id"), Some(&Value::Null));

        let sale = store
            .insert(
                "sales",
                &Record::new()
                    .set("flower_id", flower)
                    .set("quantity", 2)
                    .set("total_price", 3.5),
            )
            .await
            .unwrap();
        let record = store.get("sales", sale).await.unwrap().unwrap();
        assert!(matches!(record.get("sale_date"), Some(Value::Date(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_values() {
        let store = test_store().await;

        // Missing required field
        let err = store
            .insert("flowers", &Record::new().set("price", 2.5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { .. })
        ));

        // Wrong type
        let err = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", "cheap"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::TypeMismatch { .. })
        ));

        // Caller-supplied id
        let err = store
            .insert(
                "suppliers",
                &Record::new().set("id", 7).set("name", "Garden Co"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ReadOnly { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_rejects_dangling_reference() {
        let store = test_store().await;

        let err = store
            .insert(
                "sales",
                &Record::new()
                    .set("flower_id", 99)
                    .set("quantity", 1)
                    .set("total_price", 2.5),
            )
            .await
            .unwrap_err();

        match err {
            StoreError::NotFound { entity, id } => {
                assert_eq!(entity, "flowers");
                assert_eq!(id, "99");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_entity_rejected() {
        let store = test_store().await;
        let err = store
            .insert("ghosts", &Record::new().set("name", "Boo"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Schema(SchemaError::EntityNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_changes_only_named_fields() {
        let store = test_store().await;
        let id = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", 2.5),
            )
            .await
            .unwrap();

        store
            .update("flowers", id, &Record::new().set("price", 3.0))
            .await
            .unwrap();

        let record = store.get("flowers", id).await.unwrap().unwrap();
        assert_eq!(record.get("price"), Some(&Value::Real(3.0)));
        assert_eq!(record.get("name"), Some(&Value::Text("Rose".to_string())));
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = test_store().await;

        let err = store
            .update("flowers", 42, &Record::new().set("price", 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        // An empty update is still an existence probe
        let err = store.update("flowers", 42, &Record::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let id = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", 2.5),
            )
            .await
            .unwrap();
        store.update("flowers", id, &Record::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_null_rules() {
        let store = test_store().await;
        let id = store
            .insert(
                "suppliers",
                &Record::new().set("name", "Garden Co").set("contact", "055-1234"),
            )
            .await
            .unwrap();

        // Nullable field can be cleared
        store
            .update("suppliers", id, &Record::new().set("contact", Value::Null))
            .await
            .unwrap();
        let record = store.get("suppliers", id).await.unwrap().unwrap();
        assert_eq!(record.get("contact"), Some(&Value::Null));

        // Required field cannot
        let err = store
            .update("suppliers", id, &Record::new().set("name", Value::Null))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NotNull { .. })
        ));
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let store = test_store().await;

        store
            .upsert(
                "flowers",
                7,
                &Record::new().set("name", "Lily").set("price", 4.0),
            )
            .await
            .unwrap();
        let record = store.get("flowers", 7).await.unwrap().unwrap();
        assert_eq!(record.get("name"), Some(&Value::Text("Lily".to_string())));

        store
            .upsert(
                "flowers",
                7,
                &Record::new()
                    .set("name", "Lily")
                    .set("quantity", 30)
                    .set("price", 4.25),
            )
            .await
            .unwrap();
        let record = store.get("flowers", 7).await.unwrap().unwrap();
        assert_eq!(record.get("quantity"), Some(&Value::Integer(30)));
        assert_eq!(store.count("flowers", &Filter::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = test_store().await;
        let id = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", 2.5),
            )
            .await
            .unwrap();

        assert!(store.delete("flowers", id).await.unwrap());
        assert!(store.get("flowers", id).await.unwrap().is_none());

        // Second delete is a no-op, not an error
        assert!(!store.delete("flowers", id).await.unwrap());
    }

    #[tokio::test]
    async fn test_adjust_accumulates() {
        let store = test_store().await;
        let id = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", 2.5),
            )
            .await
            .unwrap();

        store
            .adjust("flowers", id, "quantity", Value::Integer(10))
            .await
            .unwrap();
        store
            .adjust("flowers", id, "quantity", Value::Integer(-3))
            .await
            .unwrap();

        let record = store.get("flowers", id).await.unwrap().unwrap();
        assert_eq!(record.get("quantity"), Some(&Value::Integer(7)));
    }

    #[tokio::test]
    async fn test_adjust_rejects_bad_requests() {
        let store = test_store().await;
        let id = store
            .insert(
                "flowers",
                &Record::new().set("name", "Rose").set("price", 2.5),
            )
            .await
            .unwrap();

        let err = store
            .adjust("flowers", 99, "quantity", Value::Integer(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        // Delta type must match the field type
        let err = store
            .adjust("flowers", id, "quantity", Value::Real(1.5))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Text fields are not adjustable
        let err = store
            .adjust("flowers", id, "name", Value::Integer(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let store = test_store().await;
        for (name, price) in [("Rose", 2.5), ("Tulip", 1.75), ("Lily", 2.5)] {
            store
                .insert(
                    "flowers",
                    &Record::new().set("name", name).set("price", price),
                )
                .await
                .unwrap();
        }

        assert_eq!(store.count("flowers", &Filter::new()).await.unwrap(), 3);
        assert_eq!(
            store
                .count("flowers", &Filter::new().eq("price", 2.5))
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_query_orders_and_restarts() {
        let store = test_store().await;
        for (name, price) in [("Rose", 2.5), ("Tulip", 1.75), ("Lily", 4.0)] {
            store
                .insert(
                    "flowers",
                    &Record::new().set("name", name).set("price", price),
                )
                .await
                .unwrap();
        }

        let listing = store
            .query("flowers", &Filter::new(), Some(Order::desc("price")))
            .unwrap();
        let rows = listing.fetch_all().await.unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|r| r.get("name").cloned())
            .collect();
        assert_eq!(
            names,
            vec![
                Some(Value::Text("Lily".to_string())),
                Some(Value::Text("Rose".to_string())),
                Some(Value::Text("Tulip".to_string())),
            ]
        );

        // Same query, fetched again, sees later writes
        store
            .insert(
                "flowers",
                &Record::new().set("name", "Orchid").set("price", 9.0),
            )
            .await
            .unwrap();
        let rows = listing.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0].get("name"),
            Some(&Value::Text("Orchid".to_string()))
        );
    }

    #[tokio::test]
    async fn test_query_rejects_unknown_field() {
        let store = test_store().await;
        let err = store
            .query("flowers", &Filter::new().eq("color", "red"), None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::UnknownField { .. })
        ));
    }
}
