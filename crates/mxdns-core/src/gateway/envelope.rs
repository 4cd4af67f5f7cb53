//! List response normalization

use crate::error::{Error, Result};
use serde_json::Value;

/// Unwrap a list response into its items
///
/// - `{"items": [...]}` yields the items; a missing or `null` field yields `[]`
/// - a bare array is returned as-is (organizations and networks arrive unwrapped)
/// - `null` (empty body) yields `[]`
/// - anything else is a decode error
pub fn unwrap_items(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut envelope) => match envelope.remove("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::decode(format!(
                "expected `items` to be an array, got {}",
                kind(&other)
            ))),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(Error::decode(format!(
            "expected a list envelope, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
