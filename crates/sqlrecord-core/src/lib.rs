//! Core types and traits for SQLRecord Rust.
//!
//! `sqlrecord-core` is the base-entity layer that generic persistence code
//! builds on. It turns a concrete record into ordered or keyed views of its
//! persistable fields, encodes composite values into storage-safe form, and
//! identifies the record's primary key by position.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: [`Record`] and [`Entity`] are implemented by record
//!   types (usually via `#[derive(Record)]` from `sqlrecord-macros`).
//! - **Data model**: [`Value`], [`Field`] and [`FieldShape`] describe field
//!   values and their declared shapes.
//! - **Engine**: the [`exposure`] policy, the [`Introspector`], the
//!   [`encode`] module and the [`key`] resolver.
//!
//! Drivers and query builders are out of scope; they consume the views this
//! crate produces and write into each record's [`OperationState`].

pub mod config;
pub mod encode;
pub mod entity;
pub mod error;
pub mod exposure;
pub mod field;
pub mod introspect;
pub mod key;
pub mod value;

pub use config::IntrospectConfig;
pub use entity::{Cursor, Entity, OperationState, Record, ResultSet, Row};
pub use error::{EncodingError, Error, ErrorKind, Result, TypeMismatch};
pub use exposure::{FieldSource, is_exposed};
pub use field::{Column, Field, FieldShape, FieldType};
pub use introspect::Introspector;
pub use key::PrimaryKey;
pub use value::Value;
