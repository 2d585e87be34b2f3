//! # Flowershop
//!
//! A flower shop back office built entirely from declared entities:
//! the schema module names the tables, and every screen below is the
//! generic machinery running over those declarations.
//!
//! ## Architecture
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  flowershop                    │
//! │   schema.rs — entity declarations (the app)    │
//! │   main.rs   — walkthrough over the kiosk API   │
//! └────────────────────┬───────────────────────────┘
//!                      │
//!        ┌─────────────┼─────────────┐
//!        ▼             ▼             ▼
//!   kiosk-view     kiosk-db     kiosk-core
//!   (bindings)     (store)      (schema/values)
//! ```
//!
//! ## What It Shows
//! - Opening a store and creating tables from the registry
//! - Listing rows through a `ViewBinding`
//! - Reference pickers (`"{id} - {label}"`) and form submission
//! - A rejected submission surfacing its message
//! - A sale recorded as a sale row plus a stock adjustment
//! - A date-range report with revenue and top sellers

mod schema;
mod seed;

use std::path::PathBuf;

use chrono::{Days, Utc};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use kiosk_core::{Record, Value};
use kiosk_db::{AmountExpr, FieldRef, Filter, Store, StoreConfig, SummaryRequest};
use kiosk_view::{reference_choices, selected_id, FormInput, ViewBinding};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    println!("🌼 Flowershop");
    println!("=============");

    let db_path = database_path()?;
    println!("Database: {}", db_path.display());

    let store = Store::open(schema::registry()?, StoreConfig::new(&db_path)).await?;
    println!("✓ Store open, tables ready");

    if seed::seed_if_empty(&store).await? {
        println!("✓ Demo data seeded");
    }

    // Inventory screen: a binding over the flowers entity
    println!();
    println!("Inventory");
    println!("---------");
    let mut inventory = ViewBinding::new(store.clone(), "flowers")?;
    inventory.refresh().await?;
    render_table(&inventory.columns(), inventory.rows());

    // Reference picker, as a supplier dropdown would render it
    println!();
    println!("Supplier picker:");
    let suppliers = reference_choices(&store, "suppliers", "name").await?;
    for choice in &suppliers {
        println!("  {}", choice);
    }
    let picked = suppliers
        .first()
        .map(|choice| choice.to_string())
        .ok_or("no suppliers to pick from")?;
    let supplier_id = selected_id(&picked).ok_or("picker text without an id")?;
    println!("Selected \"{}\", which resolves to supplier {}", picked, supplier_id);

    // Form submission through the binding
    println!();
    println!("Adding a flower through the form layer...");
    let form = FormInput::new()
        .set("name", "Peony")
        .set("quantity", "12")
        .set("price", "4.25")
        .set("supplier_id", supplier_id.to_string());
    let peony_id = inventory.submit(&form).await?;
    println!("✓ Inserted flower {}", peony_id);

    // A bad entry: the binding rejects it without touching the database
    let bad = FormInput::new().set("name", "Daisy").set("price", "free");
    if let Err(err) = inventory.submit(&bad).await {
        match err.form_message() {
            Some(message) => println!("⚠ Form rejected: {}", message),
            None => return Err(err.into()),
        }
    }

    // A sale is two independent writes: the sale row, then the stock
    // adjustment. Each commits on its own.
    println!();
    println!("Selling 2 roses...");
    let (rose_id, rose_price) = {
        let rose = inventory
            .rows()
            .iter()
            .find(|row| row.get("name").and_then(Value::as_text) == Some("Rose"))
            .ok_or("no roses in stock")?;
        let id = rose.id().ok_or("listed row without an id")?;
        let price = rose
            .get("price")
            .and_then(Value::as_real)
            .unwrap_or(0.0);
        (id, price)
    };

    let sale = Record::new()
        .set("flower_id", rose_id)
        .set("quantity", 2)
        .set("total_price", rose_price * 2.0);
    let sale_id = store.insert("sales", &sale).await?;
    store
        .adjust("flowers", rose_id, "quantity", Value::Integer(-2))
        .await?;
    inventory.refresh().await?;
    println!("✓ Sale {} recorded, stock adjusted", sale_id);

    // Thirty-day report: row count, revenue, top sellers
    println!();
    let today = Utc::now().date_naive();
    let month_ago = today.checked_sub_days(Days::new(30)).unwrap_or(today);
    let request = SummaryRequest::new(
        "sales",
        "sale_date",
        month_ago,
        today,
        AmountExpr::product(
            FieldRef::own("quantity"),
            FieldRef::joined("flower_id", "price"),
        ),
        FieldRef::joined("flower_id", "name"),
    )
    .top_limit(3);
    let summary = store.reports().range_summary(&request).await?;
    println!("{}", summary);

    // Row counts across every declared entity
    println!();
    println!("Row counts");
    println!("----------");
    let registry = store.registry();
    for name in registry.entity_names() {
        let rows = store.count(name, &Filter::new()).await?;
        println!("  {:<10} {}", name, rows);
    }

    // Branch locations, as a map view would place its markers
    println!();
    println!("📍 Branches");
    let branches = store
        .query("locations", &Filter::new(), None)?
        .fetch_all()
        .await?;
    for branch in &branches {
        let address = branch
            .get("address")
            .map(Value::to_string)
            .unwrap_or_default();
        let latitude = branch
            .get("latitude")
            .and_then(Value::as_real)
            .unwrap_or(0.0);
        let longitude = branch
            .get("longitude")
            .and_then(Value::as_real)
            .unwrap_or(0.0);
        println!("  {} at ({:.4}, {:.4})", address, latitude, longitude);
    }

    store.close().await;
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Renders records as a fixed-width text table, columns in declaration
/// order.
fn render_table(columns: &[&str], rows: &[Record]) {
    let mut widths: Vec<usize> = columns.iter().map(|column| column.len()).collect();
    for row in rows {
        for (index, column) in columns.iter().enumerate() {
            widths[index] = widths[index].max(cell_text(row, column).len());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{:<width$}", column))
        .collect();
    println!("  {}", header.join("  "));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| format!("{:<width$}", cell_text(row, column)))
            .collect();
        println!("  {}", cells.join("  "));
    }
}

/// One cell's text; absent and null values render empty.
fn cell_text(row: &Record, column: &str) -> String {
    row.get(column).map(Value::to_string).unwrap_or_default()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kiosk_db=debug,kiosk_view=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.kiosk.flowershop/flowershop.db`
/// - **Windows**: `%APPDATA%\kiosk\flowershop\flowershop.db`
/// - **Linux**: `~/.local/share/flowershop/flowershop.db`
///
/// ## Development Override
/// Set `FLOWERSHOP_DB_PATH` environment variable to use a custom path.
fn database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("FLOWERSHOP_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "kiosk", "flowershop")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("flowershop.db"))
}
