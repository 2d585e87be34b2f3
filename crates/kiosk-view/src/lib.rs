//! # kiosk-view: View Binding Layer
//!
//! The boundary between display widgets and the engine. A widget toolkit
//! hands this crate raw entry text and renders the row lists it gets
//! back; everything typed, validated, and persistent happens below.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kiosk View Layer                                 │
//! │                                                                         │
//! │  Widget toolkit (out of scope: tables, entries, dropdowns)              │
//! │       │ raw text                             ▲ rows / choices           │
//! │       ▼                                      │                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kiosk-view (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │   │
//! │  │   │   binding    │   │     form     │   │     choices      │  │   │
//! │  │   │ ViewBinding  │   │  FormInput   │   │ "{id} - {label}" │  │   │
//! │  │   │ refresh /    │   │  text ──►    │   │ reference        │  │   │
//! │  │   │ submit cycle │   │  Record      │   │ dropdowns        │  │   │
//! │  │   └──────┬───────┘   └──────────────┘   └──────────────────┘  │   │
//! │  │          │                                                      │   │
//! │  │          │  NO SQL IN THIS CRATE                                │   │
//! │  └──────────┼──────────────────────────────────────────────────────┘   │
//! │             ▼                                                           │
//! │  kiosk-db::Store (all persistence)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`binding`] - The refresh/submit cycle against one entity
//! - [`form`] - Raw form entries and their typed conversion
//! - [`choices`] - Reference dropdown strings
//! - [`error`] - What the widget layer sees when things fail

// =============================================================================
// Module Declarations
// =============================================================================

pub mod binding;
pub mod choices;
pub mod error;
pub mod form;

// =============================================================================
// Re-exports
// =============================================================================

pub use binding::{BindingState, ViewBinding};
pub use choices::{reference_choices, selected_id, Choice};
pub use error::{BindError, BindResult};
pub use form::FormInput;
