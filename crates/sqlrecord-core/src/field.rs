//! Field descriptors.
//!
//! A record exposes its data as a statically declared list of [`Field`]s, one
//! per member, in declaration order. Each descriptor pairs the member name with
//! its current [`Value`] and its declared [`FieldShape`].

use std::collections::BTreeMap;

use crate::value::Value;

/// The declared shape of a field.
///
/// Only `Map` and `TextList` change under encoding; every other shape is
/// passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    Integer,
    Float,
    Boolean,
    Text,
    Bytes,
    /// Ordered string-keyed map.
    Map,
    /// List of strings.
    TextList,
    /// Anything the encoder does not recognize.
    Other,
}

impl FieldShape {
    /// Get a lowercase name for this shape.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldShape::Integer => "integer",
            FieldShape::Float => "float",
            FieldShape::Boolean => "boolean",
            FieldShape::Text => "text",
            FieldShape::Bytes => "bytes",
            FieldShape::Map => "map",
            FieldShape::TextList => "text list",
            FieldShape::Other => "other",
        }
    }
}

/// A Rust type that can be stored in a record field.
///
/// `SHAPE` is fixed per type, so a nullable field keeps its declared shape
/// even while it holds `None`.
pub trait FieldType {
    /// Declared shape of fields of this type.
    const SHAPE: FieldShape;

    /// Lower the current value.
    fn to_value(&self) -> Value;
}

macro_rules! impl_field_type_int {
    ($($t:ty),*) => {
        $(
            impl FieldType for $t {
                const SHAPE: FieldShape = FieldShape::Integer;

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_field_type_int!(i8, i16, i32, i64, u8, u16, u32);

/// Wide unsigned integers. Values above `i64::MAX` are carried as their
/// decimal text; the field still declares [`FieldShape::Integer`].
macro_rules! impl_field_type_wide_uint {
    ($($t:ty),*) => {
        $(
            impl FieldType for $t {
                const SHAPE: FieldShape = FieldShape::Integer;

                fn to_value(&self) -> Value {
                    i64::try_from(*self)
                        .map_or_else(|_| Value::Text(self.to_string()), Value::Int)
                }
            }
        )*
    };
}

impl_field_type_wide_uint!(u64, usize);

impl FieldType for isize {
    const SHAPE: FieldShape = FieldShape::Integer;

    #[allow(clippy::cast_possible_truncation)]
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }
}

impl FieldType for f32 {
    const SHAPE: FieldShape = FieldShape::Float;

    fn to_value(&self) -> Value {
        Value::Double(f64::from(*self))
    }
}

impl FieldType for f64 {
    const SHAPE: FieldShape = FieldShape::Float;

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
}

impl FieldType for bool {
    const SHAPE: FieldShape = FieldShape::Boolean;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldType for String {
    const SHAPE: FieldShape = FieldShape::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldType for Vec<u8> {
    const SHAPE: FieldShape = FieldShape::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl FieldType for Vec<String> {
    const SHAPE: FieldShape = FieldShape::TextList;

    fn to_value(&self) -> Value {
        Value::TextList(self.clone())
    }
}

impl FieldType for BTreeMap<String, Value> {
    const SHAPE: FieldShape = FieldShape::Map;

    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }
}

impl FieldType for Vec<Value> {
    const SHAPE: FieldShape = FieldShape::Other;

    fn to_value(&self) -> Value {
        Value::List(self.clone())
    }
}

impl FieldType for serde_json::Value {
    const SHAPE: FieldShape = FieldShape::Other;

    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl FieldType for Value {
    const SHAPE: FieldShape = FieldShape::Other;

    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const SHAPE: FieldShape = T::SHAPE;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldType::to_value)
    }
}

/// A single (name, value, shape) descriptor produced for one introspection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Member name.
    pub name: &'static str,
    /// Declared shape.
    pub shape: FieldShape,
    /// Current value.
    pub value: Value,
}

impl Field {
    /// Describe a typed member; the shape comes from the Rust type.
    pub fn of<T: FieldType>(name: &'static str, value: &T) -> Self {
        Self {
            name,
            shape: T::SHAPE,
            value: value.to_value(),
        }
    }

    /// Describe a member from a loose value; the shape is read off the value.
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            name,
            shape: value.shape(),
            value,
        }
    }

    /// Override the declared shape.
    pub fn with_shape(mut self, shape: FieldShape) -> Self {
        self.shape = shape;
        self
    }

    /// Split into a `(name, value)` pair.
    pub fn into_pair(self) -> (&'static str, Value) {
        (self.name, self.value)
    }
}

/// A field's name and declared shape, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub shape: FieldShape,
}

impl From<&Field> for Column {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name,
            shape: field.shape,
        }
    }
}
