//! Dynamic field values.
//!
//! `Value` is the tagged variant every record field is lowered to before it
//! reaches persistence code. The variants are the shapes the encoder knows
//! about; anything else is carried through `List` or `Json` untouched.

use std::collections::BTreeMap;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::field::FieldShape;

/// A field value lowered from a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (`None` fields).
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating point number.
    Double(f64),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered string-keyed map of arbitrary values.
    Map(BTreeMap<String, Value>),
    /// List of strings.
    TextList(Vec<String>),
    /// Heterogeneous list. Not recognized by the encoder.
    List(Vec<Value>),
    /// Arbitrary JSON document. Not recognized by the encoder.
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the SQL-ish type name of this value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Double(_) => "DOUBLE",
            Value::Text(_) => "TEXT",
            Value::Bytes(_) => "BYTES",
            Value::Map(_) => "MAP",
            Value::TextList(_) => "TEXT[]",
            Value::List(_) => "LIST",
            Value::Json(_) => "JSON",
        }
    }

    /// Get the shape of this value.
    ///
    /// `Null` and unrecognized composites report [`FieldShape::Other`].
    pub const fn shape(&self) -> FieldShape {
        match self {
            Value::Bool(_) => FieldShape::Boolean,
            Value::Int(_) => FieldShape::Integer,
            Value::Double(_) => FieldShape::Float,
            Value::Text(_) => FieldShape::Text,
            Value::Bytes(_) => FieldShape::Bytes,
            Value::Map(_) => FieldShape::Map,
            Value::TextList(_) => FieldShape::TextList,
            Value::Null | Value::List(_) | Value::Json(_) => FieldShape::Other,
        }
    }

    /// Try to get this value as an i64.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as a bool.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Serializes to plain, untagged JSON.
///
/// Non-finite floats and raw bytes have no faithful JSON form and are
/// rejected instead of being coerced.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Double(f) => {
                if f.is_finite() {
                    serializer.serialize_f64(*f)
                } else {
                    Err(S::Error::custom(format!(
                        "non-finite float {} cannot be encoded",
                        f
                    )))
                }
            }
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(_) => Err(S::Error::custom(
                "raw bytes cannot be encoded as structured text",
            )),
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::TextList(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::List(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::TextList(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::TextList(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
