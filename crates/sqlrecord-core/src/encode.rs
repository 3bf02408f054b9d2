//! Value encoder.
//!
//! Lowers a field value to the form persistence code writes:
//!
//! - `Value::Map` becomes compact JSON text (keys in map order).
//! - `Value::TextList` becomes its elements joined with `,`.
//! - Everything else is returned unchanged.
//!
//! The comma join is lossy: `["a,b", "c"]` and `["a", "b", "c"]` both encode
//! to `"a,b,c"`. No escaping is applied, so stored lists stay byte-compatible
//! with existing comma-delimited columns.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::value::Value;

/// Separator used when joining string lists.
pub const LIST_SEPARATOR: &str = ",";

/// Encode a value into its storage-safe representation.
pub fn encode(value: Value) -> Result<Value> {
    match value {
        Value::Map(map) => encode_map(&map).map(Value::Text),
        Value::TextList(items) => Ok(Value::Text(join_text_list(&items))),
        other => Ok(other),
    }
}

/// Encode a value by reference, cloning only what is passed through.
pub fn encode_ref(value: &Value) -> Result<Value> {
    match value {
        Value::Map(map) => encode_map(map).map(Value::Text),
        Value::TextList(items) => Ok(Value::Text(join_text_list(items))),
        other => Ok(other.clone()),
    }
}

/// Serialize an ordered map to compact JSON text.
pub fn encode_map(map: &BTreeMap<String, Value>) -> Result<String> {
    Ok(serde_json::to_string(map)?)
}

/// Join a string list with [`LIST_SEPARATOR`].
pub fn join_text_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Whether `encode` rewrites values of this kind.
pub const fn is_encoded_composite(value: &Value) -> bool {
    matches!(value, Value::Map(_) | Value::TextList(_))
}
