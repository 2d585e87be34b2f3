//! # Demo Seed Data
//!
//! A small, realistic data set written once into an empty database:
//! suppliers, stocked flowers, staff, branch locations, and a few weeks
//! of sales and purchase history so the report screens show something
//! on first launch.

use chrono::{Days, NaiveDate, Utc};
use tracing::info;

use kiosk_core::Record;
use kiosk_db::{Filter, Store, StoreResult};

/// Seeds demo rows unless the database already holds data.
/// Returns whether anything was written.
pub async fn seed_if_empty(store: &Store) -> StoreResult<bool> {
    let existing = store.count("suppliers", &Filter::new()).await?;
    if existing > 0 {
        info!(existing, "Database already has data, seed skipped");
        return Ok(false);
    }

    info!("Seeding demo data");

    let garden = store
        .insert(
            "suppliers",
            &Record::new()
                .set("name", "Garden Wholesale")
                .set("contact", "055-210-4410"),
        )
        .await?;
    let bloom = store
        .insert("suppliers", &Record::new().set("name", "Bloom Imports"))
        .await?;

    let mut flower_ids = Vec::new();
    for (name, quantity, price, supplier) in [
        ("Rose", 40, 2.50, garden),
        ("Tulip", 25, 1.75, garden),
        ("Lily", 18, 3.20, bloom),
        ("Orchid", 6, 9.00, bloom),
    ] {
        let id = store
            .insert(
                "flowers",
                &Record::new()
                    .set("name", name)
                    .set("quantity", quantity)
                    .set("price", price)
                    .set("supplier_id", supplier),
            )
            .await?;
        flower_ids.push(id);
    }

    for (name, position, salary) in [
        ("Amal Haddad", "Manager", 5200.0),
        ("Lina Aoun", "Florist", 3400.0),
    ] {
        store
            .insert(
                "employees",
                &Record::new()
                    .set("name", name)
                    .set("position", position)
                    .set("salary", salary),
            )
            .await?;
    }

    // Recent history, so date-range reports have data on day one
    let today = Utc::now().date_naive();
    for (index, (flower, quantity, total)) in [
        (0usize, 3i64, 7.50f64),
        (1, 5, 8.75),
        (0, 2, 5.00),
        (2, 1, 3.20),
        (0, 4, 10.00),
    ]
    .into_iter()
    .enumerate()
    {
        store
            .insert(
                "sales",
                &Record::new()
                    .set("flower_id", flower_ids[flower])
                    .set("quantity", quantity)
                    .set("total_price", total)
                    .set("sale_date", days_ago(today, 2 * index as u64 + 1)),
            )
            .await?;
    }

    for (flower, quantity, cost, supplier, age) in [
        (0usize, 50i64, 60.0f64, garden, 20u64),
        (2, 20, 40.0, bloom, 12),
    ] {
        store
            .insert(
                "purchases",
                &Record::new()
                    .set("flower_id", flower_ids[flower])
                    .set("quantity", quantity)
                    .set("cost", cost)
                    .set("supplier_id", supplier)
                    .set("purchase_date", days_ago(today, age)),
            )
            .await?;
    }

    for (address, latitude, longitude) in [
        ("12 Harbor Road", 33.8938, 35.5018),
        ("45 Cedar Avenue", 33.8886, 35.4955),
    ] {
        store
            .insert(
                "locations",
                &Record::new()
                    .set("address", address)
                    .set("latitude", latitude)
                    .set("longitude", longitude),
            )
            .await?;
    }

    info!("Demo data seeded");
    Ok(true)
}

fn days_ago(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}
