//! # View Binding
//!
//! One table/form pair kept in sync with the store.
//!
//! ## Submit State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     submit(form) lifecycle                              │
//! │                                                                         │
//! │                ┌──────┐                                                 │
//! │        ┌──────►│ Idle │◄───────────────────────────┐                    │
//! │        │       └───┬──┘                            │                    │
//! │        │           │ submit                        │ refresh            │
//! │        │           ▼                               │                    │
//! │        │     ┌────────────┐   parse failure   ┌────┴───────┐           │
//! │        │     │ Validating ├──────────────────►│  Rejected  │           │
//! │        │     └─────┬──────┘   (no write)      └────────────┘           │
//! │        │           │ parsed                    stays until the          │
//! │        │           ▼                           next submit              │
//! │        │     ┌────────────┐                                             │
//! │        └─────┤ Committing │  insert + refresh                           │
//! │   store fault└────────────┘                                             │
//! │                                                                         │
//! │  &mut self receivers: one submit-to-refresh cycle at a time per        │
//! │  binding, matching a serially dispatched UI event loop.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refresh Discipline
//! `refresh()` replaces the displayed rows wholesale from a re-run of
//! the bound query; there is no row diffing. Display layers that clear
//! and repopulate a list widget map onto this directly.

use tracing::debug;

use kiosk_core::{EntityDefinition, Record, ID_FIELD};
use kiosk_db::{Filter, Order, RecordQuery, Store, StoreError};

use crate::error::{BindError, BindResult};
use crate::form::{to_insert_record, to_update_record, FormInput};

// =============================================================================
// Binding State
// =============================================================================

/// Where a binding is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Ready for the next operation.
    Idle,

    /// Checking submitted input.
    Validating,

    /// Writing to the store.
    Committing,

    /// The last submission failed validation; nothing was written. The
    /// form keeps its entries so the user can correct them.
    Rejected,
}

// =============================================================================
// View Binding
// =============================================================================

/// Binds one entity listing to a display list and accepts form
/// submissions against it.
///
/// ## Example
/// ```rust,ignore
/// let mut binding = ViewBinding::new(store.clone(), "flowers")?;
/// binding.refresh().await?;
///
/// let id = binding
///     .submit(&FormInput::new().set("name", "Rose").set("price", "2.50"))
///     .await?;
/// for row in binding.rows() {
///     // render row
/// }
/// ```
#[derive(Debug)]
pub struct ViewBinding {
    store: Store,
    entity: EntityDefinition,
    query: RecordQuery,
    rows: Vec<Record>,
    state: BindingState,
}

impl ViewBinding {
    /// Binds an entity's default listing: every row, ordered by id.
    pub fn new(store: Store, entity: &str) -> BindResult<Self> {
        ViewBinding::filtered(store, entity, Filter::new(), Some(Order::asc(ID_FIELD)))
    }

    /// Binds a filtered/ordered listing of an entity.
    ///
    /// The filter and order are validated and fixed here; every
    /// [`refresh`](ViewBinding::refresh) re-runs the same query.
    pub fn filtered(
        store: Store,
        entity: &str,
        filter: Filter,
        order: Option<Order>,
    ) -> BindResult<Self> {
        let definition = store
            .registry()
            .get(entity)
            .map_err(StoreError::from)?
            .clone();
        let query = store.query(entity, &filter, order)?;

        Ok(ViewBinding {
            store,
            entity: definition,
            query,
            rows: Vec::new(),
            state: BindingState::Idle,
        })
    }

    /// The bound entity's name.
    pub fn entity_name(&self) -> &str {
        &self.entity.name
    }

    /// Column headings: `id`, then the declared fields in definition
    /// order.
    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(ID_FIELD)
            .chain(self.entity.field_names())
            .collect()
    }

    /// The rows as of the last refresh.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Where the binding is in its submit cycle.
    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Re-runs the bound query and replaces the rows wholesale.
    /// Returns the new row count.
    pub async fn refresh(&mut self) -> BindResult<usize> {
        self.rows = self.query.fetch_all().await?;
        debug!(
            entity = %self.entity.name,
            rows = self.rows.len(),
            "Refreshed binding"
        );
        Ok(self.rows.len())
    }

    /// Submits a form as a new record: validate, insert, refresh.
    ///
    /// On a validation failure the binding moves to
    /// [`BindingState::Rejected`], nothing is written, and the error
    /// carries the field-level message. Store failures leave the binding
    /// [`BindingState::Idle`] and propagate unchanged.
    pub async fn submit(&mut self, form: &FormInput) -> BindResult<i64> {
        self.state = BindingState::Validating;
        let record = match to_insert_record(&self.entity, form) {
            Ok(record) => record,
            Err(err) => {
                debug!(entity = %self.entity.name, error = %err, "Submission rejected");
                self.state = BindingState::Rejected;
                return Err(BindError::Validation(err));
            }
        };

        self.state = BindingState::Committing;
        let id = match self.store.insert(&self.entity.name, &record).await {
            Ok(id) => id,
            Err(StoreError::Validation(err)) => {
                debug!(entity = %self.entity.name, error = %err, "Submission rejected");
                self.state = BindingState::Rejected;
                return Err(BindError::Validation(err));
            }
            Err(other) => {
                self.state = BindingState::Idle;
                return Err(BindError::Store(other));
            }
        };

        self.state = BindingState::Idle;
        self.refresh().await?;
        Ok(id)
    }

    /// Submits a form as a partial update of one row, then refreshes.
    ///
    /// Empty entries leave required fields unchanged and clear nullable
    /// ones. Same state cycle as [`submit`](ViewBinding::submit).
    pub async fn submit_update(&mut self, id: i64, form: &FormInput) -> BindResult<()> {
        self.state = BindingState::Validating;
        let record = match to_update_record(&self.entity, form) {
            Ok(record) => record,
            Err(err) => {
                debug!(entity = %self.entity.name, id, error = %err, "Update rejected");
                self.state = BindingState::Rejected;
                return Err(BindError::Validation(err));
            }
        };

        self.state = BindingState::Committing;
        match self.store.update(&self.entity.name, id, &record).await {
            Ok(()) => {}
            Err(StoreError::Validation(err)) => {
                debug!(entity = %self.entity.name, id, error = %err, "Update rejected");
                self.state = BindingState::Rejected;
                return Err(BindError::Validation(err));
            }
            Err(other) => {
                self.state = BindingState::Idle;
                return Err(BindError::Store(other));
            }
        }

        self.state = BindingState::Idle;
        self.refresh().await?;
        Ok(())
    }

    /// Deletes one row and refreshes. Removing an id that is already
    /// gone is a no-op; the return value tells whether a row went away.
    pub async fn remove(&mut self, id: i64) -> BindResult<bool> {
        let deleted = self.store.delete(&self.entity.name, id).await?;
        self.refresh().await?;
        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
