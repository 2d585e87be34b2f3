//! # kiosk-core: Declarative Schema Model
//!
//! This crate is the **heart** of every kiosk application. A business
//! domain is described once, as data, and the rest of the system is
//! driven by that description.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kiosk Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Application (apps/flowershop, ...)              │   │
//! │  │        entity definitions + seed data + orchestration           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kiosk-view (Binding Layer)                   │   │
//! │  │        refresh / submit cycle, raw form text, choices           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ registry  │  │  record   │  │ validation│  │   │
//! │  │   │  Entity   │  │  Schema   │  │  Record   │  │   parse   │  │   │
//! │  │   │  Field    │  │ Registry  │  │  Value    │  │  prepare  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kiosk-db (Storage Layer)                     │   │
//! │  │          SQLite store, filters, aggregates, reports             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity/field definitions and typed values
//! - [`registry`] - The validated set of definitions an app runs with
//! - [`record`] - A row as a name-to-value map
//! - [`validation`] - Identifier checks, text parsing, record preparation
//! - [`error`] - Schema and validation error types
//!
//! ## Design Principles
//!
//! 1. **Schema is data**: entity definitions serialize, so a new business
//!    app is a configuration file, not a fork of the engine
//! 2. **No I/O**: database, network, file system, and clock access are
//!    forbidden here; callers pass `today` in where dates are defaulted
//! 3. **Explicit Errors**: all errors are typed, never strings or panics
//! 4. **Fail at bootstrap**: everything that can be checked at
//!    registration time is, so runtime errors are about data, not shape
//!
//! ## Example Usage
//!
//! ```rust
//! use kiosk_core::registry::SchemaRegistry;
//! use kiosk_core::types::{EntityDefinition, FieldDefinition};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(
//!     EntityDefinition::new("flowers")
//!         .field(FieldDefinition::text("name"))
//!         .field(FieldDefinition::integer("quantity").default_value(0))
//!         .field(FieldDefinition::real("price")),
//! )?;
//!
//! let flowers = registry.get("flowers")?;
//! assert_eq!(flowers.fields.len(), 3);
//! # Ok::<(), kiosk_core::SchemaError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod record;
pub mod registry;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kiosk_core::Record` instead of
// `use kiosk_core::record::Record`

pub use error::{SchemaError, SchemaResult, ValidationError, ValidationResult};
pub use record::Record;
pub use registry::SchemaRegistry;
pub use types::{DefaultSpec, EntityDefinition, FieldDefinition, FieldType, Reference, Value};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The implicit primary-key column present on every entity.
///
/// ## Why a constant?
/// The store assigns it, filters and orderings may name it, and entities
/// may not declare it. Everyone agreeing on one spelling keeps those
/// rules in one place.
pub const ID_FIELD: &str = "id";

/// Maximum length of an entity or field identifier.
///
/// Generous for human-written schemas while keeping generated SQL and
/// log lines readable.
pub const MAX_IDENTIFIER_LEN: usize = 64;
