//! Error types for record introspection and lifecycle operations.

use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout SQLRecord.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the base-entity layer.
///
/// Introspection views never fail on their own; errors come from encoding a
/// composite value, classifying a key of the wrong shape, or from a lifecycle
/// hook that a concrete record did not (or could not) carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A lifecycle operation was called on a record that does not override it.
    NotImplemented {
        /// Type name of the record.
        entity: &'static str,
        /// Operation that was invoked (e.g. `"create"`).
        operation: &'static str,
    },
    /// A composite value could not be converted to its canonical text form.
    Encoding(EncodingError),
    /// A value did not have the shape an operation requires.
    TypeMismatch(TypeMismatch),
    /// A persistence override found no matching record.
    NoRecordFound,
    /// A persistence override reported a database-level failure.
    Database(String),
}

/// The `Error` variant, without payload, for cheap matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotImplemented,
    Encoding,
    TypeMismatch,
    NoRecordFound,
    Database,
}

impl Error {
    /// Get the kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::NotImplemented { .. } => ErrorKind::NotImplemented,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::NoRecordFound => ErrorKind::NoRecordFound,
            Error::Database(_) => ErrorKind::Database,
        }
    }

    /// Attach a field name to an encoding error that does not carry one yet.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn in_field(self, field: &'static str) -> Self {
        match self {
            Error::Encoding(mut err) if err.field.is_none() => {
                err.field = Some(field);
                Error::Encoding(err)
            }
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotImplemented { entity, operation } => {
                write!(f, "{}::{} is not implemented", entity, operation)
            }
            Error::Encoding(err) => write!(f, "{}", err),
            Error::TypeMismatch(err) => write!(f, "{}", err),
            Error::NoRecordFound => write!(f, "no record found"),
            Error::Database(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl StdError for Error {}

/// A composite value could not be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// The field being encoded, when known.
    pub field: Option<&'static str>,
    /// Serializer message.
    pub message: String,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "failed to encode field '{}': {}", field, self.message),
            None => write!(f, "failed to encode value: {}", self.message),
        }
    }
}

/// A value had a shape other than the one an operation expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// The field whose value was inspected.
    pub field: &'static str,
    /// Human-readable description of the accepted shapes.
    pub expected: &'static str,
    /// Type name of the value actually found.
    pub found: &'static str,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch for field '{}': expected {}, found {}",
            self.field, self.expected, self.found
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encoding(EncodingError {
            field: None,
            message: err.to_string(),
        })
    }
}
