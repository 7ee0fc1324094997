//! Loading a [`ValuesSpec`] from a YAML manifest.
//!
//! ```yaml
//! valuesFrom:
//!   - file: base.yaml
//!   - path: configmap.yaml
//!     key: values.yaml
//!     optional: true
//! values:
//!   image: {tag: v1}
//! set:
//!   - name: image.tag
//!     value: v2
//!   - name: db.password
//!     valueFrom: {path: secret.yaml, key: password}
//! ```

use super::compose::{SetOverride, ValuesSpec};
use super::error::Error;
use super::mutation::value_type_name;
use super::serialize::{parse_yaml, scalar_to_string, serialize};
use super::source::SourceRef;
use fyaml::Value;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

type Mapping = IndexMap<Value, Value>;

impl ValuesSpec {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
        Self::from_yaml(&text)
            .map_err(|e| Error::Base(format!("Invalid manifest '{}': {}", path.display(), e)))
    }

    /// Parse manifest text.
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let root = parse_yaml(text).map_err(Error::Decode)?;
        let map = match &root {
            Value::Null => return Ok(ValuesSpec::default()),
            Value::Mapping(map) => map,
            other => return Err(unexpected("manifest", "a mapping", other)),
        };

        let mut spec = ValuesSpec::default();
        for (key, value) in map {
            match key_str(key)? {
                "valuesFrom" => {
                    spec.values_from = sequence(value, "valuesFrom")?
                        .iter()
                        .map(|entry| parse_source(entry, "valuesFrom"))
                        .collect::<Result<_, _>>()?;
                }
                "values" => spec.values = parse_inline(value)?,
                "set" => {
                    spec.set = sequence(value, "set")?
                        .iter()
                        .map(parse_override)
                        .collect::<Result<_, _>>()?;
                }
                other => return Err(Error::Base(format!("unknown manifest key '{}'", other))),
            }
        }
        Ok(spec)
    }
}

fn parse_inline(value: &Value) -> Result<String, Error> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(raw) => Ok(raw.clone()),
        Value::Mapping(_) => serialize(value),
        other => Err(unexpected("values", "a mapping or a string", other)),
    }
}

fn parse_override(entry: &Value) -> Result<SetOverride, Error> {
    let map = mapping(entry, "set entry")?;
    let mut over = SetOverride::default();
    let mut has_name = false;

    for (key, value) in map {
        match key_str(key)? {
            "name" => {
                over.name = scalar(value, "set.name")?;
                has_name = true;
            }
            "value" => over.value = scalar(value, "set.value")?,
            "valueFrom" => over.value_from = Some(parse_source(value, "set.valueFrom")?),
            other => return Err(Error::Base(format!("unknown key '{}' in set entry", other))),
        }
    }

    if !has_name {
        return Err(Error::Base("set entry without a name".to_string()));
    }
    Ok(over)
}

fn parse_source(entry: &Value, context: &str) -> Result<SourceRef, Error> {
    let map = mapping(entry, context)?;
    let mut file = None;
    let mut path = None;
    let mut key = None;
    let mut optional = false;

    for (k, value) in map {
        match key_str(k)? {
            "file" => file = Some(PathBuf::from(scalar(value, context)?)),
            "path" => path = Some(PathBuf::from(scalar(value, context)?)),
            "key" => key = Some(scalar(value, context)?),
            "optional" => match value {
                Value::Bool(b) => optional = *b,
                other => return Err(unexpected(context, "a boolean for 'optional'", other)),
            },
            other => {
                return Err(Error::Base(format!(
                    "unknown key '{}' in {}",
                    other, context
                )))
            }
        }
    }

    match (file, path) {
        (Some(file), None) if key.is_none() && !optional => Ok(SourceRef::File(file)),
        (None, Some(path)) => Ok(SourceRef::Key {
            path,
            key,
            optional,
        }),
        _ => Err(Error::Base(format!(
            "{} needs either 'file' alone, or 'path' with optional 'key' and 'optional'",
            context
        ))),
    }
}

fn key_str(key: &Value) -> Result<&str, Error> {
    match key {
        Value::String(s) => Ok(s.as_str()),
        other => Err(unexpected("manifest key", "a string", other)),
    }
}

fn mapping<'a>(value: &'a Value, context: &str) -> Result<&'a Mapping, Error> {
    match value {
        Value::Mapping(map) => Ok(map),
        other => Err(unexpected(context, "a mapping", other)),
    }
}

fn sequence<'a>(value: &'a Value, context: &str) -> Result<&'a [Value], Error> {
    match value {
        Value::Null => Ok(&[][..]),
        Value::Sequence(seq) => Ok(seq.as_slice()),
        other => Err(unexpected(context, "a sequence", other)),
    }
}

fn scalar(value: &Value, context: &str) -> Result<String, Error> {
    scalar_to_string(value).ok_or_else(|| unexpected(context, "a scalar", value))
}

fn unexpected(context: &str, expected: &str, found: &Value) -> Error {
    Error::Base(format!(
        "{}: expected {}, got {}",
        context,
        expected,
        value_type_name(found)
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
