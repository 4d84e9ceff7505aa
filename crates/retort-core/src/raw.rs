//! Helpers over raw, untyped input.
//!
//! Raw input is a [`serde_json::Value`]: string-keyed mappings, ordered
//! sequences and scalars, exactly what a decoded JSON or form body looks like.

use serde_json::{Number, Value};

/// Alias for the untyped input handed to a build.
pub type RawInput = Value;

/// Looks up a field on a raw mapping.
///
/// An absent key, an explicit `null`, and a lookup on a value that is not a
/// mapping all yield `None`.
pub(crate) fn lookup<'a>(raw: &'a Value, name: &str) -> Option<&'a Value> {
    raw.get(name).filter(|value| !value.is_null())
}

/// Renders a raw value for an error message.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Interprets a raw value as a number.
///
/// JSON numbers are numeric as-is. Strings are numeric when they hold a
/// finite decimal number, ignoring surrounding whitespace; form payloads
/// carry every scalar as a string.
///
/// Strings are normalized to the number they denote, so `"012"` becomes
/// `12` and `"59.50"` becomes `59.5`.
pub(crate) fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
