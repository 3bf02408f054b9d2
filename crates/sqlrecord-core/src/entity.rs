//! The entity base contract.
//!
//! [`Record`] is what a concrete record type supplies to the introspection
//! layer: its declared fields, an optional curated override list, and access
//! to its [`OperationState`]. It is usually derived with `#[derive(Record)]`.
//!
//! [`Entity`] adds the overridable lifecycle hooks. Its defaults fail with
//! [`Error::NotImplemented`], so a record type opts in with an empty
//! `impl Entity for T {}` and overrides what its persistence layer supports.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Record)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     _rev: i64,
//!     #[record(state)]
//!     state: OperationState,
//! }
//!
//! impl Entity for User {
//!     fn create(&mut self) -> Result<()> {
//!         let row = self.fields(1)?; // everything after the key
//!         // ... write `row`, then:
//!         self.state_mut().set_results(ResultSet::new().with_inserted_id(42));
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::field::{Column, Field};
use crate::introspect::Introspector;
use crate::key::PrimaryKey;
use crate::value::Value;

/// A structured value whose fields are candidates for persistence.
pub trait Record {
    /// All fields in declaration order, including metadata fields.
    fn declared_fields(&self) -> Vec<Field>;

    /// A curated, explicitly ordered field set used instead of
    /// [`declared_fields`](Record::declared_fields).
    ///
    /// The prefix exclusion rule is not applied to this list.
    fn exposed_override(&self) -> Option<Vec<Field>> {
        None
    }

    /// Last result and error of this record's persistence operations.
    fn state(&self) -> &OperationState;

    /// Mutable access to the operation state.
    fn state_mut(&mut self) -> &mut OperationState;

    /// Ordered `(name, encoded value)` pairs of exposed fields from `offset`.
    fn fields(&self, offset: usize) -> Result<Vec<(&'static str, Value)>> {
        self.fields_with(&Introspector::default(), offset)
    }

    /// [`fields`](Record::fields) through a configured introspector.
    fn fields_with(
        &self,
        introspector: &Introspector,
        offset: usize,
    ) -> Result<Vec<(&'static str, Value)>> {
        introspector.fields(self, offset)
    }

    /// `name -> encoded value` mapping of exposed fields from `offset`.
    fn fields_as_map(&self, offset: usize) -> Result<HashMap<&'static str, Value>> {
        self.fields_as_map_with(&Introspector::default(), offset)
    }

    fn fields_as_map_with(
        &self,
        introspector: &Introspector,
        offset: usize,
    ) -> Result<HashMap<&'static str, Value>> {
        introspector.fields_as_map(self, offset)
    }

    /// Ordered `(name, value)` pairs of exposed fields from `offset`, unencoded.
    fn raw_fields(&self, offset: usize) -> Vec<(&'static str, Value)> {
        self.raw_fields_with(&Introspector::default(), offset)
    }

    fn raw_fields_with(
        &self,
        introspector: &Introspector,
        offset: usize,
    ) -> Vec<(&'static str, Value)> {
        introspector.raw_fields(self, offset)
    }

    /// Names and declared shapes of exposed fields from `offset`.
    fn columns(&self, offset: usize) -> Vec<Column> {
        self.columns_with(&Introspector::default(), offset)
    }

    fn columns_with(&self, introspector: &Introspector, offset: usize) -> Vec<Column> {
        introspector.columns(self, offset)
    }

    /// The record's identity, taken from its first exposed field.
    fn primary_key(&self) -> PrimaryKey {
        self.primary_key_with(&Introspector::default())
    }

    fn primary_key_with(&self, introspector: &Introspector) -> PrimaryKey {
        introspector.primary_key(self)
    }

    /// Whether the key holds its "unset" value (`0` or `""`).
    fn key_is_empty(&self) -> Result<bool> {
        self.key_is_empty_with(&Introspector::default())
    }

    fn key_is_empty_with(&self, introspector: &Introspector) -> Result<bool> {
        introspector.key_is_empty(self)
    }
}

/// Lifecycle hooks implemented by concrete persistence layers.
pub trait Entity: Record {
    /// Write this record as a new row.
    ///
    /// The default records [`Error::NotImplemented`] in the operation state
    /// and returns it.
    fn create(&mut self) -> Result<()> {
        let err = Error::NotImplemented {
            entity: std::any::type_name::<Self>(),
            operation: "create",
        };
        tracing::warn!(
            entity = std::any::type_name::<Self>(),
            "create() is not implemented"
        );
        self.state_mut().record_error(&err);
        Err(err)
    }
}

/// A single result row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

/// Paging information for a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Maximum rows per page (0 = unbounded).
    pub limit: usize,
    /// Rows skipped before this page.
    pub offset: usize,
    /// Total rows matching the operation, across all pages.
    pub total_records: usize,
}

/// Rows and metadata produced by a persistence operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Row>,
    /// Key assigned by the store on insert, if any.
    pub inserted_id: Option<Value>,
    pub cursor: Cursor,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Set the inserted key.
    pub fn with_inserted_id(mut self, id: impl Into<Value>) -> Self {
        self.inserted_id = Some(id.into());
        self
    }

    /// Set the paging cursor.
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-record bookkeeping written by persistence operations.
///
/// Starts empty and is never reset implicitly; callers decide when stale
/// state should be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationState {
    /// Result of the last successful operation.
    pub results: ResultSet,
    /// Error of the last failed operation.
    pub error: Option<Error>,
    /// Message of the last error, or empty.
    pub error_msg: String,
}

impl OperationState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an error and its message.
    pub fn record_error(&mut self, err: &Error) {
        self.error_msg = err.to_string();
        self.error = Some(err.clone());
    }

    /// Replace the result container.
    pub fn set_results(&mut self, results: ResultSet) {
        self.results = results;
    }

    /// Record the error of `result`, if any, and pass it through.
    pub fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.record_error(err);
        }
        result
    }

    /// True if an error has been recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Reset results and error.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
