//! Schema validation for list and item responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::HttpError;

/// Decode a list response into typed items.
///
/// Accepts `{"<key>": [...]}`, a bare `[...]`, and a `null` list (the
/// backend serializes an empty slice as `null`).
///
/// # Errors
///
/// Returns `HttpError::Schema` if the value has neither shape or an item does
/// not match `T`.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>, HttpError> {
    let items = match value {
        items @ Value::Array(_) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) => return Ok(Vec::new()),
            Some(items @ Value::Array(_)) => items,
            Some(_) => {
                return Err(HttpError::Schema(format!("'{key}' is not a list")));
            }
            None => {
                return Err(HttpError::Schema(format!("missing '{key}' list")));
            }
        },
        Value::Null => return Ok(Vec::new()),
        _ => return Err(HttpError::Schema(format!("expected a list of {key}"))),
    };

    serde_json::from_value(items).map_err(|e| HttpError::Schema(format!("invalid {key}: {e}")))
}

/// Decode a mutation response that may carry the affected entity.
///
/// Accepts `{"<key>": {...}}` or the bare entity (any object with an `id`).
/// Acknowledgement-only bodies such as `{"message": "..."}` yield `None`.
///
/// # Errors
///
/// Returns `HttpError::Schema` if an entity is present but does not match `T`.
pub fn decode_item<T: DeserializeOwned>(value: Value, key: &str) -> Result<Option<T>, HttpError> {
    let Value::Object(mut map) = value else {
        return Ok(None);
    };

    let entity = match map.remove(key) {
        Some(Value::Null) | None if !map.contains_key("id") => return Ok(None),
        Some(entity @ Value::Object(_)) => entity,
        None | Some(Value::Null) => Value::Object(map),
        Some(_) => return Err(HttpError::Schema(format!("'{key}' is not an object"))),
    };

    serde_json::from_value(entity)
        .map(Some)
        .map_err(|e| HttpError::Schema(format!("invalid {key}: {e}")))
}
