//! SQLRecord: base-entity introspection for Rust ORMs.
//!
//! A record type derives [`Record`] to describe its fields, then generic
//! persistence code reads ordered or keyed views of it:
//!
//! ```ignore
//! use sqlrecord::prelude::*;
//!
//! #[derive(Record, Default)]
//! struct Hero {
//!     id: i64,
//!     name: String,
//!     powers: Vec<String>,
//!     _dirty: bool,
//!     #[record(state)]
//!     state: OperationState,
//! }
//!
//! impl Entity for Hero {}
//!
//! let hero = Hero { id: 1, name: "Ada".into(), powers: vec!["x".into(), "y".into()], ..Default::default() };
//! assert_eq!(hero.primary_key().name, "id");
//! assert_eq!(hero.fields(1)?, vec![
//!     ("name", Value::from("Ada")),
//!     ("powers", Value::from("x,y")),
//! ]);
//! ```
//!
//! Members named with `_` or `internal_` are metadata and never appear in the
//! views. A record's first exposed member is its primary key.

pub use sqlrecord_core::*;
pub use sqlrecord_macros::Record;

/// Commonly used items.
pub mod prelude {
    pub use sqlrecord_core::{
        Column, Cursor, Entity, Error, ErrorKind, Field, FieldShape, FieldType,
        IntrospectConfig, Introspector, OperationState, PrimaryKey, Record, Result, ResultSet,
        Row, Value,
    };
    pub use sqlrecord_macros::Record;
}
