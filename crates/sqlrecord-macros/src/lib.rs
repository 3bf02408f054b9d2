//! Procedural macros for SQLRecord.
//!
//! - `#[derive(Record)]` implements `sqlrecord_core::Record` from a struct's
//!   named fields.
//!
//! # Attributes
//!
//! Field attributes:
//!
//! - `#[record(state)]`: the `OperationState` member (exactly one, required).
//! - `#[record(skip)]`: leave the member out of the field table.
//! - `#[record(rename = "col")]`: report the member under another name.
//!
//! Struct attributes:
//!
//! - `#[record(expose(a, b, ...))]`: a curated field set, in that order, used
//!   instead of the full declared list.
//!
//! Every other member must implement `sqlrecord_core::FieldType`: the integer,
//! float, `bool` and `String` primitives, `Vec<u8>`, `Vec<String>`,
//! `BTreeMap<String, Value>`, `Vec<Value>`, `serde_json::Value`, `Value`, and
//! `Option` of any of these. Members named
//! with a leading `_` or `internal_` are still declared; the exposure policy
//! hides them at introspection time.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record_derive;

/// Derive `Record` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqlrecord::prelude::*;
///
/// #[derive(Record, Default)]
/// struct Hero {
///     id: i64,
///     name: String,
///     tags: Vec<String>,
///     internal_loaded_at: i64,
///     #[record(state)]
///     state: OperationState,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record_derive::parse_record(&input) {
        Ok(def) => record_derive::generate_record_impl(&def).into(),
        Err(e) => e.to_compile_error().into(),
    }
}
