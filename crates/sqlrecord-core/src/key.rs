//! Primary key resolution.
//!
//! A record's key is its first exposed field. Authors mark the key purely by
//! declaring it first; there is no attribute for it.

use crate::entity::Record;
use crate::error::{Error, Result, TypeMismatch};
use crate::field::{Field, FieldShape};
use crate::introspect::Introspector;
use crate::value::Value;

/// Key name reported by records with no exposed fields.
pub const FALLBACK_KEY_NAME: &str = "id";
/// Key value reported by records with no exposed fields.
pub const FALLBACK_KEY_VALUE: &str = "unknown";

/// The identity of a record: name and raw (unencoded) value of its key field.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    pub name: &'static str,
    pub value: Value,
    pub shape: FieldShape,
}

impl PrimaryKey {
    /// The key of a record that exposes nothing: `("id", "unknown")`.
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_KEY_NAME,
            value: Value::Text(FALLBACK_KEY_VALUE.to_string()),
            shape: FieldShape::Text,
        }
    }

    /// Whether this key identifies a not-yet-persisted record.
    ///
    /// Decided by the declared shape: integer keys are empty when zero, text
    /// keys when zero-length, and a null value of either is empty. A value
    /// that does not fit the declared shape, or any other shape, is a
    /// [`Error::TypeMismatch`].
    pub fn is_empty(&self) -> Result<bool> {
        match (self.shape, &self.value) {
            (FieldShape::Integer, Value::Int(n)) => Ok(*n == 0),
            // unsigned values beyond i64 travel as decimal text
            (FieldShape::Integer, Value::Text(s)) if is_decimal(s) => Ok(false),
            (FieldShape::Text, Value::Text(s)) => Ok(s.is_empty()),
            (FieldShape::Integer | FieldShape::Text, Value::Null) => Ok(true),
            (shape, other) => Err(Error::TypeMismatch(TypeMismatch {
                field: self.name,
                expected: match shape {
                    FieldShape::Integer => "integer",
                    FieldShape::Text => "text",
                    _ => "integer or text",
                },
                found: other.type_name(),
            })),
        }
    }

    /// Split into a `(name, value)` pair.
    pub fn into_pair(self) -> (&'static str, Value) {
        (self.name, self.value)
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl From<Field> for PrimaryKey {
    fn from(field: Field) -> Self {
        Self {
            name: field.name,
            value: field.value,
            shape: field.shape,
        }
    }
}

impl Introspector {
    /// Resolve the key of a record from its first exposed field.
    pub fn primary_key<R: Record + ?Sized>(&self, record: &R) -> PrimaryKey {
        self.exposed(record, 0)
            .into_iter()
            .next()
            .map_or_else(PrimaryKey::fallback, PrimaryKey::from)
    }

    /// Check whether a record's key is empty.
    pub fn key_is_empty<R: Record + ?Sized>(&self, record: &R) -> Result<bool> {
        let key = self.primary_key(record);
        let empty = key.is_empty()?;
        if self.config().debug {
            tracing::debug!(key = key.name, empty, "Checked primary key");
        }
        Ok(empty)
    }
}
