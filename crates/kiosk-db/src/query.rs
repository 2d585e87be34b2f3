//! # Filters and Queries
//!
//! Read-side plumbing: filter/order descriptions, SELECT generation,
//! parameter binding, and row decoding back into typed [`Record`]s.
//!
//! A [`RecordQuery`] is lazy: building one validates field names and
//! renders SQL exactly once, but touches the database only when
//! [`RecordQuery::fetch_all`] runs. The same query can be fetched any
//! number of times, which is what the view layer's refresh cycle does.

use chrono::NaiveDate;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use tracing::debug;

use kiosk_core::{EntityDefinition, FieldDefinition, FieldType, Record, Value, ValidationError, ID_FIELD};

use crate::bootstrap::quote_ident;
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Filter
// =============================================================================

/// A conjunction of predicates over one entity's fields.
///
/// An empty filter matches every row.
///
/// ## Example
/// ```rust,ignore
/// let filter = Filter::new()
///     .eq("supplier_id", 3)
///     .between("sale_date", start, end);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone)]
enum Predicate {
    Eq {
        field: String,
        value: Value,
    },
    Between {
        field: String,
        low: Value,
        high: Value,
    },
}

impl Filter {
    /// Creates an empty filter (matches everything).
    pub fn new() -> Self {
        Filter::default()
    }

    /// Requires `field = value`. A `Null` value matches rows where the
    /// field IS NULL.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Requires `low <= field <= high`, both ends inclusive.
    ///
    /// When the bounds are dates the column is compared at date
    /// granularity (`date(col) BETWEEN date(?) AND date(?)`), so text
    /// columns holding datetime strings still match by calendar day.
    pub fn between(
        mut self,
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        self.predicates.push(Predicate::Between {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        });
        self
    }

    /// True when no predicates were added.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A single-field ordering.
#[derive(Debug, Clone)]
pub struct Order {
    pub(crate) field: String,
    pub(crate) descending: bool,
}

impl Order {
    /// Ascending order on a field (`id` is allowed).
    pub fn asc(field: impl Into<String>) -> Self {
        Order {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Order {
            field: field.into(),
            descending: true,
        }
    }
}

// =============================================================================
// SQL Generation
// =============================================================================

/// Renders a column reference, optionally qualified with a table alias,
/// after checking the field exists on the entity.
fn column_sql(
    entity: &EntityDefinition,
    name: &str,
    qualifier: Option<&str>,
) -> StoreResult<String> {
    if name != ID_FIELD && entity.get_field(name).is_none() {
        return Err(StoreError::Validation(ValidationError::UnknownField {
            entity: entity.name.clone(),
            field: name.to_string(),
        }));
    }

    let column = quote_ident(name);
    Ok(match qualifier {
        Some(alias) => format!("{}.{}", quote_ident(alias), column),
        None => column,
    })
}

/// Renders the WHERE clause for a filter, pushing bind values onto
/// `params` in placeholder order. Returns the empty string for an empty
/// filter.
pub(crate) fn where_clause(
    entity: &EntityDefinition,
    filter: &Filter,
    qualifier: Option<&str>,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    if filter.predicates.is_empty() {
        return Ok(String::new());
    }

    let mut clauses = Vec::with_capacity(filter.predicates.len());
    for predicate in &filter.predicates {
        match predicate {
            Predicate::Eq { field, value } => {
                let column = column_sql(entity, field, qualifier)?;
                if value.is_null() {
                    clauses.push(format!("{} IS NULL", column));
                } else if matches!(value, Value::Date(_)) {
                    clauses.push(format!("date({}) = date(?)", column));
                    params.push(value.clone());
                } else {
                    clauses.push(format!("{} = ?", column));
                    params.push(value.clone());
                }
            }
            Predicate::Between { field, low, high } => {
                let column = column_sql(entity, field, qualifier)?;
                if matches!(low, Value::Date(_)) || matches!(high, Value::Date(_)) {
                    clauses.push(format!("date({}) BETWEEN date(?) AND date(?)", column));
                } else {
                    clauses.push(format!("{} BETWEEN ? AND ?", column));
                }
                params.push(low.clone());
                params.push(high.clone());
            }
        }
    }

    Ok(format!(" WHERE {}", clauses.join(" AND ")))
}

/// Renders the ORDER BY clause, or the empty string when no order was
/// requested.
pub(crate) fn order_clause(
    entity: &EntityDefinition,
    order: Option<&Order>,
    qualifier: Option<&str>,
) -> StoreResult<String> {
    match order {
        Some(order) => {
            let column = column_sql(entity, &order.field, qualifier)?;
            let direction = if order.descending { "DESC" } else { "ASC" };
            Ok(format!(" ORDER BY {} {}", column, direction))
        }
        None => Ok(String::new()),
    }
}

/// The explicit column list for an entity: `id` first, then declared
/// fields in definition order.
pub(crate) fn select_columns(entity: &EntityDefinition) -> String {
    let mut columns = Vec::with_capacity(entity.fields.len() + 1);
    columns.push(quote_ident(ID_FIELD));
    for field in &entity.fields {
        columns.push(quote_ident(&field.name));
    }
    columns.join(", ")
}

/// Builds the full SELECT for a filter/order pair.
pub(crate) fn select_sql(
    entity: &EntityDefinition,
    filter: &Filter,
    order: Option<&Order>,
) -> StoreResult<(String, Vec<Value>)> {
    let mut params = Vec::new();
    let where_sql = where_clause(entity, filter, None, &mut params)?;
    let order_sql = order_clause(entity, order, None)?;

    let sql = format!(
        "SELECT {} FROM {}{}{}",
        select_columns(entity),
        quote_ident(&entity.name),
        where_sql,
        order_sql
    );

    Ok((sql, params))
}

// =============================================================================
// Binding and Decoding
// =============================================================================

/// Binds one typed value onto a query.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Integer(n) => query.bind(*n),
        Value::Real(x) => query.bind(*x),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Date(d) => query.bind(*d),
        Value::Null => query.bind(Option::<i64>::None),
    }
}

/// Decodes one column by name according to its declared type. SQL NULL
/// becomes [`Value::Null`] regardless of type.
fn decode_field(row: &SqliteRow, field: &FieldDefinition) -> StoreResult<Value> {
    let name = field.name.as_str();
    let value = match field.field_type {
        FieldType::Integer => row.try_get::<Option<i64>, _>(name)?.map(Value::Integer),
        FieldType::Real => row.try_get::<Option<f64>, _>(name)?.map(Value::Real),
        FieldType::Text => row.try_get::<Option<String>, _>(name)?.map(Value::Text),
        FieldType::Date => row.try_get::<Option<NaiveDate>, _>(name)?.map(Value::Date),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Decodes a full row into a record: `id` plus every declared field.
pub(crate) fn decode_record(entity: &EntityDefinition, row: &SqliteRow) -> StoreResult<Record> {
    let mut record = Record::new();

    let id: i64 = row.try_get(ID_FIELD)?;
    record.insert(ID_FIELD, id);

    for field in &entity.fields {
        record.insert(field.name.clone(), decode_field(row, field)?);
    }

    Ok(record)
}

/// Decodes one column by position according to a field type, for
/// aggregate results that have no entity column behind them.
pub(crate) fn decode_scalar(
    row: &SqliteRow,
    index: usize,
    field_type: FieldType,
) -> StoreResult<Value> {
    let value = match field_type {
        FieldType::Integer => row.try_get::<Option<i64>, _>(index)?.map(Value::Integer),
        FieldType::Real => row.try_get::<Option<f64>, _>(index)?.map(Value::Real),
        FieldType::Text => row.try_get::<Option<String>, _>(index)?.map(Value::Text),
        FieldType::Date => row.try_get::<Option<NaiveDate>, _>(index)?.map(Value::Date),
    };
    Ok(value.unwrap_or(Value::Null))
}

// =============================================================================
// Record Query
// =============================================================================

/// A prepared, restartable listing of one entity.
///
/// Field names were validated and SQL rendered when the query was built;
/// each [`fetch_all`](RecordQuery::fetch_all) call re-executes the same
/// statement against current data.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    pool: SqlitePool,
    entity: EntityDefinition,
    sql: String,
    params: Vec<Value>,
}

impl RecordQuery {
    pub(crate) fn new(
        pool: SqlitePool,
        entity: EntityDefinition,
        sql: String,
        params: Vec<Value>,
    ) -> Self {
        RecordQuery {
            pool,
            entity,
            sql,
            params,
        }
    }

    /// The entity this query lists.
    pub fn entity_name(&self) -> &str {
        &self.entity.name
    }

    /// Executes the query and decodes every matching row.
    pub async fn fetch_all(&self) -> StoreResult<Vec<Record>> {
        debug!(entity = %self.entity.name, "Fetching records");

        let mut query = sqlx::query(&self.sql);
        for value in &self.params {
            query = bind_value(query, value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(|row| decode_record(&self.entity, row))
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(entity = %self.entity.name, count = records.len(), "Fetched records");
        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
