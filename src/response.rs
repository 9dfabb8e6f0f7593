//! Response shaping: sub-key traversal and typed materialization.
//!
//! Typed-object requests locate their payload in two independent steps:
//! [`navigate`] descends an ordered list of sub-keys into the parsed JSON,
//! then [`materialize`] (or [`materialize_list`]) decodes the located
//! fragment into the caller's model. Both are pure functions over
//! `serde_json::Value`, so they are testable without any transport.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;

/// Descends `sub_keys` in order into a parsed JSON value.
///
/// `["data", "items"]` means: index `data` at the top level, then `items`
/// inside it, and return what remains. An empty `sub_keys` returns the value
/// unchanged.
///
/// ## Errors
///
/// [`ValidationError::MissingSubKey`] when a key is absent or an intermediate
/// value is not a JSON object. There is no partial result: the first missing
/// key aborts the traversal.
pub fn navigate(value: Value, sub_keys: &[&str]) -> Result<Value, ValidationError> {
    let mut current = value;
    for key in sub_keys {
        current = match current {
            Value::Object(mut map) => {
                map.remove(*key).ok_or_else(|| ValidationError::MissingSubKey {
                    key: key.to_string(),
                })?
            }
            _ => {
                return Err(ValidationError::MissingSubKey {
                    key: key.to_string(),
                })
            }
        };
    }
    Ok(current)
}

/// Decodes a located JSON fragment into one model value.
///
/// The whole fragment is handed to the model's deserializer; a fragment that
/// happens to be an array decodes as a whole (use [`materialize_list`] to
/// decode per-element instead).
pub fn materialize<T: DeserializeOwned>(value: Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(ValidationError::Decode)
}

/// Decodes a located JSON array into a model value per element.
///
/// ## Errors
///
/// [`ValidationError::NotAList`] when the fragment is not an array;
/// [`ValidationError::Decode`] when any element fails to decode.
pub fn materialize_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ValidationError::NotAList {
                found: json_type_name(&other),
            })
        }
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ValidationError::Decode))
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
