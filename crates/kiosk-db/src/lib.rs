//! # kiosk-db: Storage Layer for Kiosk Apps
//!
//! This crate owns every SQL statement in the system. It turns the
//! entity definitions of `kiosk-core` into SQLite tables and serves
//! schema-checked CRUD, filtered queries, and date-range reports over
//! them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kiosk Data Flow                                 │
//! │                                                                         │
//! │  ViewBinding::submit / refresh (kiosk-view)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kiosk-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │     query     │    │    report    │  │   │
//! │  │   │  (store.rs)   │    │  (query.rs)   │    │ (report.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Filter/Order  │    │ ReportEngine │  │   │
//! │  │   │ CRUD + refs   │    │ RecordQuery   │    │ RangeSummary │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐                                            │   │
//! │  │   │   bootstrap   │  CREATE TABLE IF NOT EXISTS per entity     │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │          one local file per application instance                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The store handle: pool, CRUD, aggregates
//! - [`bootstrap`] - Table creation from entity definitions
//! - [`query`] - Filters, orderings, restartable queries
//! - [`report`] - Date-range statistics and summaries
//! - [`config`] - Store configuration
//! - [`error`] - Storage error types
//!
//! ## Why Runtime SQL
//! Entities are declared at runtime, so statements are generated and
//! bound through the runtime query API. Identifiers never come from
//! user input: every entity and field name passed identifier validation
//! at registration, and is double-quoted in generated SQL anyway.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiosk_db::{Store, StoreConfig, Filter, Order};
//!
//! let store = Store::open(registry, StoreConfig::new("./shop.db")).await?;
//!
//! let id = store
//!     .insert("flowers", &Record::new().set("name", "Rose").set("price", 2.5))
//!     .await?;
//!
//! let listing = store.query("flowers", &Filter::new(), Some(Order::asc("name")))?;
//! for record in listing.fetch_all().await? {
//!     println!("{:?}", record);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod bootstrap;

pub mod config;
pub mod error;
pub mod query;
pub mod report;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use query::{Filter, Order, RecordQuery};
pub use report::{
    AmountExpr, FieldRef, GroupRow, Metric, RangeSummary, ReportEngine, SummaryRequest,
};
pub use store::Store;
