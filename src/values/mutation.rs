//! Path-addressed mutation of values documents.
//!
//! Writes a string at a `--set` path, creating any missing mapping or
//! sequence on the way and keeping whatever structure already exists.

use super::error::Error;
use super::path::{parse_path, Segment};
use fyaml::Value;

/// Set `value` at `path` inside `root`.
///
/// The path is parsed in full before `root` is touched, so a malformed path
/// leaves the document unchanged. A null root is turned into an empty mapping
/// first.
pub fn set_value(path: &str, root: &mut Value, value: &str) -> Result<(), Error> {
    let segments = parse_path(path)?;
    if matches!(root, Value::Null) {
        *root = new_mapping();
    }

    // parse_path always yields at least one segment
    let Some((last, parents)) = segments.split_last() else {
        return Err(Error::MalformedPath(format!("empty path '{}'", path)));
    };

    let mut current = root;
    for segment in parents {
        current = traverse(current, segment, path)?;
    }
    assign(current, last, Value::String(value.to_string()), path)
}

/// Resolve or create the mapping `segment` designates inside `node`.
fn traverse<'a>(node: &'a mut Value, segment: &Segment, path: &str) -> Result<&'a mut Value, Error> {
    let map = as_mapping(node, segment, path)?;
    let key = Value::String(segment.name.clone());

    let child = match segment.index {
        None => fill_null(map.entry(key).or_insert(Value::Null), new_mapping),
        Some(index) => {
            let list = fill_null(map.entry(key).or_insert(Value::Null), new_sequence);
            let seq = as_sequence(list, segment, path)?;
            grow(seq, index);
            fill_null(&mut seq[index], new_mapping)
        }
    };

    if !matches!(child, Value::Mapping(_)) {
        return Err(type_conflict(path, segment, child, "traverse"));
    }
    Ok(child)
}

/// Write `value` at the terminal `segment` of `node`, replacing what was there.
fn assign(node: &mut Value, segment: &Segment, value: Value, path: &str) -> Result<(), Error> {
    let map = as_mapping(node, segment, path)?;
    let key = Value::String(segment.name.clone());

    match segment.index {
        None => {
            map.insert(key, value);
        }
        Some(index) => {
            let list = fill_null(map.entry(key).or_insert(Value::Null), new_sequence);
            let seq = as_sequence(list, segment, path)?;
            grow(seq, index);
            seq[index] = value;
        }
    }
    Ok(())
}

/// Replace a null (absent) slot with a fresh container.
fn fill_null(slot: &mut Value, fresh: fn() -> Value) -> &mut Value {
    if matches!(slot, Value::Null) {
        *slot = fresh();
    }
    slot
}

fn new_mapping() -> Value {
    Value::Mapping(Default::default())
}

fn new_sequence() -> Value {
    Value::Sequence(Vec::new())
}

/// Make `seq` long enough to hold `index`, padding with nulls.
fn grow(seq: &mut Vec<Value>, index: usize) {
    if seq.len() <= index {
        seq.resize(index + 1, Value::Null);
    }
}

fn as_mapping<'a>(
    node: &'a mut Value,
    segment: &Segment,
    path: &str,
) -> Result<&'a mut indexmap::IndexMap<Value, Value>, Error> {
    match node {
        Value::Mapping(map) => Ok(map),
        other => Err(type_conflict(path, segment, other, "set key on")),
    }
}

fn as_sequence<'a>(
    node: &'a mut Value,
    segment: &Segment,
    path: &str,
) -> Result<&'a mut Vec<Value>, Error> {
    match node {
        Value::Sequence(seq) => Ok(seq),
        other => Err(type_conflict(path, segment, other, "index")),
    }
}

fn type_conflict(path: &str, segment: &Segment, found: &Value, action: &str) -> Error {
    Error::TypeConflict(format!(
        "invalid path '{}', cannot {} {} at '{}'.",
        path,
        action,
        value_type_name(found),
        segment
    ))
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
