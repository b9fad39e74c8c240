//! Decoding JSON object bodies into entries

use envsnag_core::{Error, Result, ResolvedEntry};
use serde_json::Value;
use tracing::warn;

/// Decode a JSON object body into one entry per key, in document order.
///
/// `locator` names the body in errors; `prefix` is attached to every entry.
pub fn decode_object(
    body: &str,
    locator: &str,
    origin: &str,
    prefix: Option<&str>,
) -> Result<Vec<ResolvedEntry>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::decode(locator, format!("body is not valid JSON: {e}")))?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(Error::decode(
                locator,
                format!("expected a JSON object, found {}", kind(&other)),
            ))
        }
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        match coerce_value(&value) {
            Some(value) => {
                let entry = ResolvedEntry::new(key, value, origin);
                entries.push(match prefix {
                    Some(prefix) => entry.with_prefix(prefix),
                    None => entry,
                });
            }
            None => warn!(
                source = %origin,
                key = %key,
                kind = kind(&value),
                "skipping value that is not a string, number or boolean"
            ),
        }
    }
    Ok(entries)
}

/// Scalar JSON values as environment strings.
///
/// Numbers print in plain decimal, booleans as `1`/`0`. Anything else has
/// no string form and yields `None`.
#[must_use]
pub fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            i.to_string()
        } else if let Some(u) = n.as_u64() {
            u.to_string()
        } else {
            // f64 Display never uses exponent notation and drops ".0"
            n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
        }),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
