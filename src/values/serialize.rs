//! Decoding and serialization of values documents.

use super::error::Error;
use super::mutation::value_type_name;
use fyaml::{Number, Value};

/// Parse YAML text into a value.
///
/// Blank input is a null document rather than a parse error.
pub fn parse_yaml(text: &str) -> Result<Value, String> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    text.parse().map_err(|e| format!("{}", e))
}

/// Check that a decoded value can serve as a values document.
///
/// A null document is an empty mapping; any other non-mapping root is
/// rejected. Scalar mapping keys are turned into strings at every depth, so
/// `1:` and `'1':` address the same entry.
pub fn into_document(value: Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Mapping(Default::default())),
        Value::Mapping(_) => Ok(stringify_keys(value)),
        other => Err(format!(
            "expected a mapping at document root, got {}",
            value_type_name(&other)
        )),
    }
}

fn stringify_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, child)| (key_to_string(key), stringify_keys(child)))
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(stringify_keys).collect()),
        other => other,
    }
}

fn key_to_string(key: Value) -> Value {
    match key {
        Value::String(_) => key,
        Value::Null => Value::String("null".to_string()),
        other => match scalar_to_string(&other) {
            Some(s) => Value::String(s),
            None => other,
        },
    }
}

/// Parse YAML text into a values document (always a mapping).
pub fn decode_document(text: &str) -> Result<Value, Error> {
    parse_yaml(text)
        .and_then(into_document)
        .map_err(Error::Decode)
}

/// Serialize Value to YAML string.
pub fn serialize(value: &Value) -> Result<String, Error> {
    value
        .to_yaml_string()
        .map_err(|e| Error::Base(format!("Failed to serialize YAML: {}", e)))
}

/// Render a scalar as plain text, without YAML quoting.
///
/// Returns `None` for sequences, mappings and tagged values.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Number(Number::Int(i)) => i.to_string(),
        Value::Number(Number::UInt(u)) => u.to_string(),
        Value::Number(Number::Float(f)) if f.is_nan() => ".nan".to_string(),
        Value::Number(Number::Float(f)) if f.is_infinite() => {
            let sign = if *f < 0.0 { "-" } else { "" };
            format!("{}.inf", sign)
        }
        Value::Number(Number::Float(f)) => f.to_string(),
        _ => return None,
    };
    Some(s)
}
