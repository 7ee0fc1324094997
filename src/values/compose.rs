//! Composition of the final values document.
//!
//! Layers, lowest precedence first: every `valuesFrom` source in list order,
//! the inline values blob, then every `--set` override in list order.

use super::error::Error;
use super::merge::merge;
use super::mutation::set_value;
use super::serialize::{into_document, parse_yaml};
use super::source::{Fetch, SourceRef, DEFAULT_SET_KEY, DEFAULT_VALUES_KEY};
use fyaml::Value;

/// A single `--set` override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOverride {
    /// Destination path, e.g. `image.tag` or `containers[0].name`.
    pub name: String,
    /// Literal value.
    pub value: String,
    /// Source of the value; takes precedence over `value` when set.
    pub value_from: Option<SourceRef>,
}

impl SetOverride {
    pub fn literal(name: &str, value: &str) -> Self {
        SetOverride {
            name: name.to_string(),
            value: value.to_string(),
            value_from: None,
        }
    }

    pub fn from_source(name: &str, source: SourceRef) -> Self {
        SetOverride {
            name: name.to_string(),
            value: String::new(),
            value_from: Some(source),
        }
    }
}

/// Everything needed to compose a values document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuesSpec {
    pub values_from: Vec<SourceRef>,
    /// Inline values, as raw YAML text.
    pub values: String,
    pub set: Vec<SetOverride>,
}

/// Compose the values document described by `spec`.
///
/// `fetch` resolves source references to raw text and `decode` turns YAML
/// text into a value. The first failure aborts composition; no partial
/// document is ever returned.
pub fn compose<F, D>(spec: &ValuesSpec, fetch: &F, decode: D) -> Result<Value, Error>
where
    F: Fetch + ?Sized,
    D: Fn(&str) -> Result<Value, String>,
{
    let decode_document = |text: &str| decode(text).and_then(into_document).map_err(Error::Decode);

    let mut base = Value::Mapping(Default::default());

    for source in &spec.values_from {
        log::debug!("merging values from '{}'", source);
        let text = fetch
            .fetch(source, DEFAULT_VALUES_KEY)
            .map_err(|e| Error::SourceFetch(format!("'{}': {}", source, e)))?;
        base = merge(base, decode_document(&text)?);
    }

    log::debug!("merging inline values");
    base = merge(base, decode_document(&spec.values)?);

    for over in &spec.set {
        let value = resolve_override(over, fetch)?;
        if value.is_empty() {
            return Err(Error::MissingValue(over.name.clone()));
        }
        log::trace!("setting '{}'", over.name);
        set_value(&over.name, &mut base, &value).map_err(|e| Error::Set {
            path: over.name.clone(),
            cause: Box::new(e),
        })?;
    }

    Ok(base)
}

/// Compose with the YAML decoder.
pub fn compose_values<F: Fetch + ?Sized>(spec: &ValuesSpec, fetch: &F) -> Result<Value, Error> {
    compose(spec, fetch, parse_yaml)
}

/// String value of an override.
///
/// Fetched text is used verbatim. An empty result means no value was
/// provided, so an explicitly empty `--set` is rejected by the caller.
fn resolve_override<F: Fetch + ?Sized>(over: &SetOverride, fetch: &F) -> Result<String, Error> {
    match &over.value_from {
        Some(source) => fetch
            .fetch(source, DEFAULT_SET_KEY)
            .map_err(|e| Error::SourceFetch(format!("'{}': {}", source, e))),
        None => Ok(over.value.clone()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::decode_document;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn doc(text: &str) -> Value {
        decode_document(text).unwrap()
    }

    fn file(name: &str) -> SourceRef {
        SourceRef::File(PathBuf::from(name))
    }

    /// In-memory fetcher keyed by `<source>#<field>`.
    struct MemorySource(HashMap<String, String>);

    impl MemorySource {
        fn new(entries: &[(&str, &str)]) -> Self {
            MemorySource(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl Fetch for MemorySource {
        fn fetch(&self, source: &SourceRef, default_key: &str) -> Result<String, String> {
            let id = format!("{}#{}", source.path().display(), source.key_or(default_key));
            self.0
                .get(&id)
                .cloned()
                .ok_or_else(|| format!("no such source {}", id))
        }
    }

    fn spec(sources: &[&str], values: &str, set: Vec<SetOverride>) -> ValuesSpec {
        ValuesSpec {
            values_from: sources.iter().map(|s| file(s)).collect(),
            values: values.to_string(),
            set,
        }
    }

    #[test]
    fn test_compose_empty() {
        let result = compose_values(&ValuesSpec::default(), &MemorySource::new(&[])).unwrap();
        assert_eq!(result, Value::Mapping(Default::default()));
    }

    #[test]
    fn test_compose_layers_in_order() {
        let fetch = MemorySource::new(&[
            ("one#values.yaml", "a: {x: 1}\n"),
            ("two#values.yaml", "b: 3\n"),
        ]);
        let spec = spec(
            &["one", "two"],
            "b: 4\nc: 5\n",
            vec![SetOverride::literal("a.x", "9")],
        );
        let result = compose_values(&spec, &fetch).unwrap();
        assert_eq!(result, doc("a: {x: '9'}\nb: 4\nc: 5"));
    }

    #[test]
    fn test_compose_later_source_map_enables_set() {
        // `a` ends up a mapping after the second source, so `a.x` can be set
        let fetch = MemorySource::new(&[
            ("one#values.yaml", "a: 1\n"),
            ("two#values.yaml", "a: {y: 2}\nb: 3\n"),
        ]);
        let spec = spec(
            &["one", "two"],
            "b: 4\nc: 5\n",
            vec![SetOverride::literal("a.x", "9")],
        );
        let result = compose_values(&spec, &fetch).unwrap();
        assert_eq!(result, doc("a: {y: 2, x: '9'}\nb: 4\nc: 5"));
    }

    #[test]
    fn test_compose_scalar_blocks_set() {
        let fetch = MemorySource::new(&[
            ("one#values.yaml", "a: 1\n"),
            ("two#values.yaml", "a: 2\nb: 3\n"),
        ]);
        let spec = spec(
            &["one", "two"],
            "b: 4\nc: 5\n",
            vec![SetOverride::literal("a.x", "9")],
        );
        match compose_values(&spec, &fetch) {
            Err(Error::Set { path, cause }) => {
                assert_eq!(path, "a.x");
                assert!(matches!(*cause, Error::TypeConflict(_)));
            }
            other => panic!("Expected Error::Set, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_set_replaces_scalar_at_terminal() {
        let fetch = MemorySource::new(&[("one#values.yaml", "a: 2\n")]);
        let spec = spec(&["one"], "", vec![SetOverride::literal("a", "x")]);
        assert_eq!(compose_values(&spec, &fetch).unwrap(), doc("a: x"));
    }

    #[test]
    fn test_compose_inline_wins_over_sources() {
        let fetch = MemorySource::new(&[("one#values.yaml", "image: {repo: nginx, tag: '1'}\n")]);
        let spec = spec(&["one"], "image: {tag: '2'}\n", vec![]);
        assert_eq!(
            compose_values(&spec, &fetch).unwrap(),
            doc("image: {repo: nginx, tag: '2'}")
        );
    }

    #[test]
    fn test_compose_overrides_apply_in_order() {
        let spec = spec(
            &[],
            "",
            vec![
                SetOverride::literal("tag", "first"),
                SetOverride::literal("tag", "second"),
                SetOverride::literal("list[1]", "b"),
            ],
        );
        assert_eq!(
            compose_values(&spec, &MemorySource::new(&[])).unwrap(),
            doc("tag: second\nlist: [null, b]")
        );
    }

    #[test]
    fn test_compose_override_from_source() {
        let fetch = MemorySource::new(&[("secret#value", "hunter2"), ("secret#user", "admin")]);
        let spec = spec(
            &[],
            "",
            vec![
                SetOverride::from_source("db.password", file("secret")),
                SetOverride::from_source(
                    "db.user",
                    SourceRef::Key {
                        path: PathBuf::from("secret"),
                        key: Some("user".to_string()),
                        optional: false,
                    },
                ),
            ],
        );
        assert_eq!(
            compose_values(&spec, &fetch).unwrap(),
            doc("db: {password: hunter2, user: admin}")
        );
    }

    #[test]
    fn test_compose_source_value_wins_over_literal() {
        let fetch = MemorySource::new(&[("secret#value", "fetched")]);
        let mut over = SetOverride::from_source("x", file("secret"));
        over.value = "literal".to_string();
        let spec = spec(&[], "", vec![over]);
        assert_eq!(compose_values(&spec, &fetch).unwrap(), doc("x: fetched"));
    }

    #[test]
    fn test_compose_fetched_value_is_not_decoded() {
        let fetch = MemorySource::new(&[("secret#value", "a: [1, 2]")]);
        let spec = spec(&[], "", vec![SetOverride::from_source("x", file("secret"))]);
        let result = compose_values(&spec, &fetch).unwrap();
        let mut expected = Value::Mapping(Default::default());
        if let Value::Mapping(map) = &mut expected {
            map.insert(
                Value::String("x".to_string()),
                Value::String("a: [1, 2]".to_string()),
            );
        }
        assert_eq!(result, expected);
    }

    #[test]
    fn test_compose_empty_literal_is_missing_value() {
        let spec = spec(&[], "", vec![SetOverride::literal("a.b", "")]);
        match compose_values(&spec, &MemorySource::new(&[])) {
            Err(Error::MissingValue(path)) => assert_eq!(path, "a.b"),
            other => panic!("Expected Error::MissingValue, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_empty_fetched_value_is_missing_value() {
        let fetch = MemorySource::new(&[("secret#value", "")]);
        let spec = spec(&[], "", vec![SetOverride::from_source("a", file("secret"))]);
        assert!(matches!(
            compose_values(&spec, &fetch),
            Err(Error::MissingValue(_))
        ));
    }

    #[test]
    fn test_compose_fetch_failure() {
        let spec = spec(&["absent"], "", vec![]);
        match compose_values(&spec, &MemorySource::new(&[])) {
            Err(Error::SourceFetch(msg)) => assert!(msg.contains("absent")),
            other => panic!("Expected Error::SourceFetch, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_override_fetch_failure() {
        let spec = spec(&[], "", vec![SetOverride::from_source("a", file("absent"))]);
        assert!(matches!(
            compose_values(&spec, &MemorySource::new(&[])),
            Err(Error::SourceFetch(_))
        ));
    }

    #[test]
    fn test_compose_decode_failure_in_source() {
        let fetch = MemorySource::new(&[("bad#values.yaml", "- not\n- a mapping\n")]);
        let spec = spec(&["bad"], "", vec![]);
        assert!(matches!(
            compose_values(&spec, &fetch),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_compose_decode_failure_inline() {
        let spec = spec(&[], "a: [unclosed", vec![]);
        assert!(matches!(
            compose_values(&spec, &MemorySource::new(&[])),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_compose_malformed_override_path() {
        let spec = spec(&[], "", vec![SetOverride::literal("a[99999999]", "v")]);
        match compose_values(&spec, &MemorySource::new(&[])) {
            Err(Error::Set { cause, .. }) => {
                assert!(matches!(*cause, Error::MalformedPath(_)))
            }
            other => panic!("Expected Error::Set, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_custom_decoder() {
        let decode = |text: &str| -> Result<Value, String> {
            if text.is_empty() {
                Ok(Value::Null)
            } else {
                Err(format!("refusing '{}'", text))
            }
        };
        let fetch = MemorySource::new(&[("one#values.yaml", "a: 1")]);
        assert_eq!(
            compose(&ValuesSpec::default(), &fetch, decode).unwrap(),
            Value::Mapping(Default::default())
        );
        match compose(&spec(&["one"], "", vec![]), &fetch, decode) {
            Err(Error::Decode(msg)) => assert!(msg.contains("refusing")),
            other => panic!("Expected Error::Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_closure_fetch() {
        let fetch = |_: &SourceRef, key: &str| -> Result<String, String> {
            Ok(format!("key: '{}'", key))
        };
        let spec = spec(&["any"], "", vec![]);
        assert_eq!(
            compose_values(&spec, &fetch).unwrap(),
            doc("key: values.yaml")
        );
    }
}
