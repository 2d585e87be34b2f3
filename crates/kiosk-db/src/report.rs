//! # Report Engine
//!
//! Date-range statistics over any registered entity: row counts, revenue
//! sums, and "top N" group rankings.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Report Composition                              │
//! │                                                                         │
//! │  range_summary(request)                                                 │
//! │       │                                                                 │
//! │       ├──► total_count ──► COUNT(*)            over date range          │
//! │       ├──► total_amount ─► SUM(left * right)   over date range          │
//! │       └──► top_n ────────► GROUP BY + COUNT    over date range          │
//! │                                                                         │
//! │  Fields may live on the entity itself or one reference hop away:        │
//! │                                                                         │
//! │    FieldRef::own("quantity")            ──► "t"."quantity"              │
//! │    FieldRef::joined("flower_id","name") ──► INNER JOIN "flowers" ...    │
//! │                                              "j_flower_id"."name"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! Groups with equal metrics are ordered by their smallest contributing
//! row id (`MIN("t"."id") ASC`), so a ranking never reshuffles between
//! runs on the same data.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::debug;

use kiosk_core::{EntityDefinition, FieldType, SchemaRegistry, Value, ValidationError, ID_FIELD};

use crate::bootstrap::quote_ident;
use crate::error::{StoreError, StoreResult};
use crate::query::{bind_value, where_clause, Filter};
use crate::store::Store;

/// Alias of the aggregated entity's table in generated SQL.
const BASE_ALIAS: &str = "t";

// =============================================================================
// Field References
// =============================================================================

/// A field usable in grouping and summing: one of the entity's own
/// fields, or a field of a referenced entity reached through one
/// reference hop.
///
/// ## Example
/// ```rust,ignore
/// FieldRef::own("quantity");                  // sales.quantity
/// FieldRef::joined("flower_id", "name");      // flowers.name, via sales.flower_id
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRef {
    /// A field declared on the entity itself (`id` is allowed).
    Own(String),

    /// A field on the entity referenced by `via`.
    Joined { via: String, field: String },
}

impl FieldRef {
    /// References a field of the entity itself.
    pub fn own(field: impl Into<String>) -> Self {
        FieldRef::Own(field.into())
    }

    /// References `field` on the entity that the reference field `via`
    /// points at.
    pub fn joined(via: impl Into<String>, field: impl Into<String>) -> Self {
        FieldRef::Joined {
            via: via.into(),
            field: field.into(),
        }
    }

    /// Human-readable spelling for error messages.
    fn describe(&self) -> String {
        match self {
            FieldRef::Own(field) => field.clone(),
            FieldRef::Joined { via, field } => format!("{via} -> {field}"),
        }
    }
}

/// What to compute per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Rows per group.
    Count,

    /// Sum of a numeric field per group.
    Sum(FieldRef),
}

/// The amount term of a revenue report: the sum of a product of two
/// numeric fields, `SUM(left * right)` (typically quantity times price,
/// with the price one reference hop away).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountExpr {
    left: FieldRef,
    right: FieldRef,
}

impl AmountExpr {
    /// Sums `left * right` per matching row.
    pub fn product(left: FieldRef, right: FieldRef) -> Self {
        AmountExpr { left, right }
    }
}

/// One group of an aggregate result: the group key and its computed
/// metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// The grouped-by value (a name, an id, a date).
    pub key: Value,

    /// The computed metric for this group.
    pub value: Value,
}

// =============================================================================
// Aggregate Planning
// =============================================================================

/// A join required by a resolved field reference.
#[derive(Debug, Clone)]
struct JoinSpec {
    alias: String,
    sql: String,
}

/// A field reference rendered against a concrete entity.
#[derive(Debug, Clone)]
struct ResolvedField {
    expr: String,
    field_type: FieldType,
    join: Option<JoinSpec>,
}

/// A fully rendered aggregate statement, ready to bind and run.
#[derive(Debug)]
pub(crate) struct AggregatePlan {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
    pub(crate) key_type: FieldType,
    pub(crate) value_type: FieldType,
}

fn unknown_field(entity: &EntityDefinition, field: &str) -> StoreError {
    StoreError::Validation(ValidationError::UnknownField {
        entity: entity.name.clone(),
        field: field.to_string(),
    })
}

/// Resolves a [`FieldRef`] against an entity: the SQL expression, the
/// declared type, and the join it needs (if any).
fn resolve_field_ref(
    registry: &SchemaRegistry,
    entity: &EntityDefinition,
    field_ref: &FieldRef,
) -> StoreResult<ResolvedField> {
    match field_ref {
        FieldRef::Own(name) => {
            let field_type = if name == ID_FIELD {
                FieldType::Integer
            } else {
                entity
                    .get_field(name)
                    .ok_or_else(|| unknown_field(entity, name))?
                    .field_type
            };
            Ok(ResolvedField {
                expr: format!("{}.{}", quote_ident(BASE_ALIAS), quote_ident(name)),
                field_type,
                join: None,
            })
        }
        FieldRef::Joined { via, field } => {
            let via_def = entity
                .get_field(via)
                .ok_or_else(|| unknown_field(entity, via))?;
            let reference = via_def.references.as_ref().ok_or_else(|| {
                StoreError::InvalidAggregate(format!(
                    "{}.{} is not a reference field",
                    entity.name, via
                ))
            })?;
            let target = registry.get(&reference.entity)?;

            let field_type = if field == ID_FIELD {
                FieldType::Integer
            } else {
                target
                    .get_field(field)
                    .ok_or_else(|| unknown_field(target, field))?
                    .field_type
            };

            let alias = format!("j_{via}");
            let join_sql = format!(
                " INNER JOIN {} AS {} ON {}.{} = {}.{}",
                quote_ident(&target.name),
                quote_ident(&alias),
                quote_ident(&alias),
                quote_ident(&reference.field),
                quote_ident(BASE_ALIAS),
                quote_ident(via)
            );

            Ok(ResolvedField {
                expr: format!("{}.{}", quote_ident(&alias), quote_ident(field)),
                field_type,
                join: Some(JoinSpec {
                    alias,
                    sql: join_sql,
                }),
            })
        }
    }
}

fn require_numeric(field_ref: &FieldRef, field_type: FieldType) -> StoreResult<()> {
    match field_type {
        FieldType::Integer | FieldType::Real => Ok(()),
        other => Err(StoreError::InvalidAggregate(format!(
            "cannot sum {} field '{}'",
            other,
            field_ref.describe()
        ))),
    }
}

fn push_join(joins: &mut Vec<JoinSpec>, join: Option<JoinSpec>) {
    if let Some(join) = join {
        if !joins.iter().any(|existing| existing.alias == join.alias) {
            joins.push(join);
        }
    }
}

/// Renders one GROUP BY statement.
///
/// Shape:
/// ```text
/// SELECT <group> AS group_key, <metric> AS metric_value
/// FROM "entity" AS "t" [INNER JOIN ...]
/// [WHERE ...]
/// GROUP BY group_key
/// ORDER BY metric_value DESC, MIN("t"."id") ASC
/// [LIMIT ?]
/// ```
pub(crate) fn aggregate_plan(
    registry: &SchemaRegistry,
    entity: &EntityDefinition,
    group_by: &FieldRef,
    metric: &Metric,
    filter: &Filter,
    limit: Option<u32>,
) -> StoreResult<AggregatePlan> {
    let mut joins = Vec::new();

    let group = resolve_field_ref(registry, entity, group_by)?;
    push_join(&mut joins, group.join.clone());

    let (metric_expr, value_type) = match metric {
        Metric::Count => ("COUNT(*)".to_string(), FieldType::Integer),
        Metric::Sum(field_ref) => {
            let summed = resolve_field_ref(registry, entity, field_ref)?;
            require_numeric(field_ref, summed.field_type)?;
            push_join(&mut joins, summed.join.clone());
            (format!("SUM({})", summed.expr), summed.field_type)
        }
    };

    let mut params = Vec::new();
    let where_sql = where_clause(entity, filter, Some(BASE_ALIAS), &mut params)?;
    let join_sql: String = joins.iter().map(|join| join.sql.as_str()).collect();

    let mut sql = format!(
        "SELECT {} AS group_key, {} AS metric_value FROM {} AS {}{}{} GROUP BY group_key ORDER BY metric_value DESC, MIN({}.{}) ASC",
        group.expr,
        metric_expr,
        quote_ident(&entity.name),
        quote_ident(BASE_ALIAS),
        join_sql,
        where_sql,
        quote_ident(BASE_ALIAS),
        quote_ident(ID_FIELD)
    );
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(i64::from(limit)));
    }

    Ok(AggregatePlan {
        sql,
        params,
        key_type: group.field_type,
        value_type,
    })
}

// =============================================================================
// Report Engine
// =============================================================================

/// Date-range statistics over one store.
///
/// Obtained from [`Store::reports`]. All ranges are inclusive on both
/// ends; an inverted range (`start > end`) is accepted and yields empty
/// results, never an error.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    store: Store,
}

impl ReportEngine {
    /// Wraps a store. Clones share the store's pool and registry.
    pub fn new(store: Store) -> Self {
        ReportEngine { store }
    }

    /// Rows of `entity` whose `date_field` falls inside the range.
    pub async fn total_count(
        &self,
        entity: &str,
        date_field: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<i64> {
        let filter = Filter::new().between(date_field, start, end);
        self.store.count(entity, &filter).await
    }

    /// Revenue over the range: `SUM(left * right)` across all matching
    /// rows. Returns `0.0` when nothing matches.
    pub async fn total_amount(
        &self,
        entity: &str,
        date_field: &str,
        start: NaiveDate,
        end: NaiveDate,
        amount: &AmountExpr,
    ) -> StoreResult<f64> {
        let registry = self.store.registry();
        let definition = registry.get(entity)?;

        let mut joins = Vec::new();
        let left = resolve_field_ref(registry, definition, &amount.left)?;
        require_numeric(&amount.left, left.field_type)?;
        push_join(&mut joins, left.join.clone());
        let right = resolve_field_ref(registry, definition, &amount.right)?;
        require_numeric(&amount.right, right.field_type)?;
        push_join(&mut joins, right.join.clone());

        let filter = Filter::new().between(date_field, start, end);
        let mut params = Vec::new();
        let where_sql = where_clause(definition, &filter, Some(BASE_ALIAS), &mut params)?;
        let join_sql: String = joins.iter().map(|join| join.sql.as_str()).collect();

        // CAST keeps integer-only products decoding as a real.
        let sql = format!(
            "SELECT CAST(SUM({} * {}) AS REAL) FROM {} AS {}{}{}",
            left.expr,
            right.expr,
            quote_ident(&definition.name),
            quote_ident(BASE_ALIAS),
            join_sql,
            where_sql
        );

        debug!(entity = %definition.name, sql = %sql, "Computing total amount");

        let mut query = sqlx::query(&sql);
        for value in &params {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(self.store.pool()).await?;
        let total: Option<f64> = row.try_get(0)?;
        Ok(total.unwrap_or(0.0))
    }

    /// The `n` most frequent groups in the range, count descending. Ties
    /// rank by first appearance (smallest contributing row id).
    pub async fn top_n(
        &self,
        entity: &str,
        date_field: &str,
        start: NaiveDate,
        end: NaiveDate,
        group_field: &FieldRef,
        n: u32,
    ) -> StoreResult<Vec<GroupRow>> {
        let filter = Filter::new().between(date_field, start, end);
        self.store
            .aggregate(entity, group_field, &Metric::Count, &filter, Some(n))
            .await
    }

    /// Runs the three statistics in one call and bundles the result.
    pub async fn range_summary(&self, request: &SummaryRequest) -> StoreResult<RangeSummary> {
        debug!(entity = %request.entity, "Building range summary");

        let total_rows = self
            .total_count(&request.entity, &request.date_field, request.start, request.end)
            .await?;
        let total_amount = self
            .total_amount(
                &request.entity,
                &request.date_field,
                request.start,
                request.end,
                &request.amount,
            )
            .await?;
        let top = self
            .top_n(
                &request.entity,
                &request.date_field,
                request.start,
                request.end,
                &request.group_by,
                request.top_limit,
            )
            .await?;

        Ok(RangeSummary {
            entity: request.entity.clone(),
            start: request.start,
            end: request.end,
            total_rows,
            total_amount,
            top,
        })
    }
}

// =============================================================================
// Range Summary
// =============================================================================

/// Everything [`ReportEngine::range_summary`] needs.
///
/// Deserializable, so an application can keep its report shapes in the
/// same configuration that declares its entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Entity the statistics run over.
    pub entity: String,

    /// Date field bounding the range.
    pub date_field: String,

    /// Inclusive range start.
    pub start: NaiveDate,

    /// Inclusive range end.
    pub end: NaiveDate,

    /// The amount term summed for revenue.
    pub amount: AmountExpr,

    /// Grouping for the top listing.
    pub group_by: FieldRef,

    /// Maximum number of top groups.
    /// Default: 5
    #[serde(default = "default_top_limit")]
    pub top_limit: u32,
}

fn default_top_limit() -> u32 {
    5
}

impl SummaryRequest {
    /// Creates a request with the default top listing size.
    pub fn new(
        entity: impl Into<String>,
        date_field: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        amount: AmountExpr,
        group_by: FieldRef,
    ) -> Self {
        SummaryRequest {
            entity: entity.into(),
            date_field: date_field.into(),
            start,
            end,
            amount,
            group_by,
            top_limit: 5,
        }
    }

    /// Sets the maximum number of top groups.
    pub fn top_limit(mut self, limit: u32) -> Self {
        self.top_limit = limit;
        self
    }
}

/// The bundled statistics for one date range, displayable as the text
/// block a report tab shows.
#[derive(Debug, Clone, Serialize)]
pub struct RangeSummary {
    /// Entity the statistics ran over.
    pub entity: String,

    /// Inclusive range start.
    pub start: NaiveDate,

    /// Inclusive range end.
    pub end: NaiveDate,

    /// Matching row count.
    pub total_rows: i64,

    /// Summed amount, `0.0` for an empty range.
    pub total_amount: f64,

    /// Top groups, count descending.
    pub top: Vec<GroupRow>,
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![
            format!("Report for {}", self.entity),
            format!("Period: {} to {}", self.start, self.end),
            format!("Total rows: {}", self.total_rows),
            format!("Total amount: {:.2}", self.total_amount),
        ];
        if !self.top.is_empty() {
            lines.push("Top entries:".to_string());
            for row in &self.top {
                lines.push(format!("  {}: {}", row.key, row.value));
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use kiosk_core::{FieldDefinition, Record};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_entities(vec![
            EntityDefinition::new("flowers")
                .field(FieldDefinition::text("name"))
                .field(FieldDefinition::real("price")),
            EntityDefinition::new("sales")
                .field(FieldDefinition::integer("flower_id").references("flowers", "id"))
                .field(FieldDefinition::integer("quantity"))
                .field(FieldDefinition::date("sale_date").default_today()),
        ])
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn sale(store: &Store, flower_id: i64, quantity: i64, day: NaiveDate) -> i64 {
        store
            .insert(
                "sales",
                &Record::new()
                    .set("flower_id", flower_id)
                    .set("quantity", quantity)
                    .set("sale_date", day),
            )
            .await
            .unwrap()
    }

    /// Rose (id 1, 2.5) and Tulip (id 2, 1.75); two January Rose sales
    /// and one February Tulip sale.
    async fn seeded_store() -> Store {
        let store = Store::open(registry(), StoreConfig::in_memory())
            .await
            .unwrap();

        for (name, price) in [("Rose", 2.5), ("Tulip", 1.75)] {
            store
                .insert(
                    "flowers",
                    &Record::new().set("name", name).set("price", price),
                )
                .await
                .unwrap();
        }
        sale(&store, 1, 2, date(2024, 1, 10)).await;
        sale(&store, 1, 1, date(2024, 1, 20)).await;
        sale(&store, 2, 5, date(2024, 2, 1)).await;

        store
    }

    #[test]
    fn test_aggregate_plan_sql() {
        let registry = registry();
        let entity = registry.get("sales").unwrap();
        let filter = Filter::new().between("sale_date", date(2024, 1, 1), date(2024, 1, 31));

        let plan = aggregate_plan(
            &registry,
            entity,
            &FieldRef::joined("flower_id", "name"),
            &Metric::Count,
            &filter,
            Some(5),
        )
        .unwrap();

        assert_eq!(
            plan.sql,
            "SELECT \"j_flower_id\".\"name\" AS group_key, COUNT(*) AS metric_value \
             FROM \"sales\" AS \"t\" \
             INNER JOIN \"flowers\" AS \"j_flower_id\" ON \"j_flower_id\".\"id\" = \"t\".\"flower_id\" \
             WHERE date(\"t\".\"sale_date\") BETWEEN date(?) AND date(?) \
             GROUP BY group_key ORDER BY metric_value DESC, MIN(\"t\".\"id\") ASC LIMIT ?"
        );
        assert_eq!(plan.params.len(), 3);
        assert_eq!(plan.key_type, FieldType::Text);
        assert_eq!(plan.value_type, FieldType::Integer);
    }

    #[test]
    fn test_plan_rejects_bad_field_refs() {
        let registry = registry();
        let entity = registry.get("sales").unwrap();

        // Joining through a non-reference field
        let err = aggregate_plan(
            &registry,
            entity,
            &FieldRef::joined("quantity", "name"),
            &Metric::Count,
            &Filter::new(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidAggregate(_)));

        // Summing a text field
        let err = aggregate_plan(
            &registry,
            entity,
            &FieldRef::own("quantity"),
            &Metric::Sum(FieldRef::joined("flower_id", "name")),
            &Filter::new(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidAggregate(_)));
    }

    #[tokio::test]
    async fn test_total_count_within_range() {
        let store = seeded_store().await;
        let reports = store.reports();

        let count = reports
            .total_count("sales", "sale_date", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_total_amount_joins_the_price() {
        let store = seeded_store().await;
        let reports = store.reports();
        let amount = AmountExpr::product(
            FieldRef::own("quantity"),
            FieldRef::joined("flower_id", "price"),
        );

        // January: Rose sales of 2 and 1 at 2.5 each
        let total = reports
            .total_amount("sales", "sale_date", date(2024, 1, 1), date(2024, 1, 31), &amount)
            .await
            .unwrap();
        assert!((total - 7.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_total_amount_empty_range_is_zero() {
        let store = seeded_store().await;
        let reports = store.reports();
        let amount = AmountExpr::product(
            FieldRef::own("quantity"),
            FieldRef::joined("flower_id", "price"),
        );

        let total = reports
            .total_amount("sales", "sale_date", date(2030, 1, 1), date(2030, 1, 31), &amount)
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn test_top_n_ranks_by_count() {
        let store = seeded_store().await;
        let reports = store.reports();

        let top = reports
            .top_n(
                "sales",
                "sale_date",
                date(2024, 1, 1),
                date(2024, 2, 28),
                &FieldRef::joined("flower_id", "name"),
                5,
            )
            .await
            .unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, Value::Text("Rose".to_string()));
        assert_eq!(top[0].value, Value::Integer(2));
        assert_eq!(top[1].key, Value::Text("Tulip".to_string()));
        assert_eq!(top[1].value, Value::Integer(1));
    }

    #[tokio::test]
    async fn test_top_n_ties_rank_by_first_row() {
        let store = seeded_store().await;
        let reports = store.reports();

        // A second Tulip sale evens the counts at 2:2. Rose appeared
        // first, so Rose stays on top.
        sale(&store, 2, 1, date(2024, 2, 2)).await;

        let top = reports
            .top_n(
                "sales",
                "sale_date",
                date(2024, 1, 1),
                date(2024, 2, 28),
                &FieldRef::joined("flower_id", "name"),
                5,
            )
            .await
            .unwrap();

        assert_eq!(top[0].key, Value::Text("Rose".to_string()));
        assert_eq!(top[1].key, Value::Text("Tulip".to_string()));
    }

    #[tokio::test]
    async fn test_top_n_limits_groups() {
        let store = seeded_store().await;
        let reports = store.reports();

        let top = reports
            .top_n(
                "sales",
                "sale_date",
                date(2024, 1, 1),
                date(2024, 2, 28),
                &FieldRef::joined("flower_id", "name"),
                1,
            )
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].key, Value::Text("Rose".to_string()));
    }

    #[tokio::test]
    async fn test_inverted_range_yields_empty_results() {
        let store = seeded_store().await;
        let reports = store.reports();
        let amount = AmountExpr::product(
            FieldRef::own("quantity"),
            FieldRef::joined("flower_id", "price"),
        );

        let count = reports
            .total_count("sales", "sale_date", date(2024, 2, 28), date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(count, 0);

        let total = reports
            .total_amount("sales", "sale_date", date(2024, 2, 28), date(2024, 1, 1), &amount)
            .await
            .unwrap();
        assert_eq!(total, 0.0);

        let top = reports
            .top_n(
                "sales",
                "sale_date",
                date(2024, 2, 28),
                date(2024, 1, 1),
                &FieldRef::joined("flower_id", "name"),
                5,
            )
            .await
            .unwrap();
        assert!(top.is_empty());
    }

    #[tokio::test]
    async fn test_sum_metric_over_groups() {
        let store = seeded_store().await;

        let rows = store
            .aggregate(
                "sales",
                &FieldRef::joined("flower_id", "name"),
                &Metric::Sum(FieldRef::own("quantity")),
                &Filter::new(),
                None,
            )
            .await
            .unwrap();

        // Tulip sold 5 units in one sale, Rose 3 across two
        assert_eq!(rows[0].key, Value::Text("Tulip".to_string()));
        assert_eq!(rows[0].value, Value::Integer(5));
        assert_eq!(rows[1].key, Value::Text("Rose".to_string()));
        assert_eq!(rows[1].value, Value::Integer(3));
    }

    #[test]
    fn test_summary_request_from_json() {
        let request: SummaryRequest = serde_json::from_str(
            r#"{
                "entity": "sales",
                "date_field": "sale_date",
                "start": "2024-01-01",
                "end": "2024-01-31",
                "amount": {
                    "left": {"own": "quantity"},
                    "right": {"joined": {"via": "flower_id", "field": "price"}}
                },
                "group_by": {"joined": {"via": "flower_id", "field": "name"}}
            }"#,
        )
        .unwrap();

        assert_eq!(request.entity, "sales");
        assert_eq!(request.top_limit, 5);
        assert_eq!(request.group_by, FieldRef::joined("flower_id", "name"));
    }

    #[tokio::test]
    async fn test_range_summary_display() {
        let store = seeded_store().await;
        let reports = store.reports();

        let request = SummaryRequest::new(
            "sales",
            "sale_date",
            date(2024, 1, 1),
            date(2024, 1, 31),
            AmountExpr::product(
                FieldRef::own("quantity"),
                FieldRef::joined("flower_id", "price"),
            ),
            FieldRef::joined("flower_id", "name"),
        );
        let summary = reports.range_summary(&request).await.unwrap();

        assert_eq!(summary.total_rows, 2);
        assert_eq!(
            summary.to_string(),
            "Report for sales\n\
             Period: 2024-01-01 to 2024-01-31\n\
             Total rows: 2\n\
             Total amount: 7.50\n\
             Top entries:\n  Rose: 2"
        );
    }
}
