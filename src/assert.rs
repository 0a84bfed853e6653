//! Precondition helpers
//!
//! Each helper checks one condition and reports a violation as
//! [`Error::InvalidArgument`]. The `what` argument names the checked value
//! in the error message.

use crate::error::{Error, Result};
use base64::Engine;
use serde_json::{Map, Value as JsonValue};

/// Assert that a string is not empty
pub fn string_not_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{} must be a non-empty string",
            what
        )));
    }
    Ok(())
}

/// Assert that an optional string is either absent or not empty
pub fn null_or_string_not_empty(value: Option<&str>, what: &str) -> Result<()> {
    match value {
        Some(v) => string_not_empty(v, what),
        None => Ok(()),
    }
}

/// Assert that a value differs from a forbidden one
pub fn not_same(value: &str, forbidden: &str, what: &str) -> Result<()> {
    if value == forbidden {
        return Err(Error::invalid_argument(format!(
            "{} must not be '{}'",
            what, forbidden
        )));
    }
    Ok(())
}

/// Assert that a mapping contains a key
pub fn key_exists(data: &Map<String, JsonValue>, key: &str) -> Result<()> {
    if !data.contains_key(key) {
        return Err(Error::invalid_argument(format!(
            "missing key '{}'",
            key
        )));
    }
    Ok(())
}

/// Read a string entry from a mapping
///
/// The key must exist and hold a JSON string.
pub fn string_entry<'a>(data: &'a Map<String, JsonValue>, key: &str) -> Result<&'a str> {
    key_exists(data, key)?;
    match data.get(key) {
        Some(JsonValue::String(s)) => Ok(s.as_str()),
        Some(other) => Err(wrong_type(key, other)),
        None => Err(Error::invalid_argument(format!("missing key '{}'", key))),
    }
}

/// Read a nullable string entry from a mapping
///
/// The key must exist; JSON `null` reads as `None`.
pub fn nullable_string_entry<'a>(
    data: &'a Map<String, JsonValue>,
    key: &str,
) -> Result<Option<&'a str>> {
    key_exists(data, key)?;
    match data.get(key) {
        Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(wrong_type(key, other)),
        None => Err(Error::invalid_argument(format!("missing key '{}'", key))),
    }
}

/// Assert that a string is valid standard base64
pub fn valid_base64(value: &str, what: &str) -> Result<()> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map(|_| ())
        .map_err(|e| {
            Error::invalid_argument(format!("{} is not a valid base64 encoding: {}", what, e))
        })
}

fn wrong_type(key: &str, value: &JsonValue) -> Error {
    let found = match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    };
    Error::invalid_argument(format!(
        "wrong type for key '{}': expected string, found {}",
        key, found
    ))
}
