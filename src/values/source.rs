//! Value sources: where `valuesFrom` documents and `--set` values come from.

use super::serialize::{parse_yaml, scalar_to_string};
use fyaml::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default field read from a data source listed in `valuesFrom`.
pub const DEFAULT_VALUES_KEY: &str = "values.yaml";

/// Default field read from a data source backing a `--set` override.
pub const DEFAULT_SET_KEY: &str = "value";

/// Reference to a blob of raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// The whole content of a file.
    File(PathBuf),
    /// One field of a data file: a YAML mapping of field names to text,
    /// shaped like the `data` block of a ConfigMap or Secret.
    Key {
        path: PathBuf,
        key: Option<String>,
        optional: bool,
    },
}

impl SourceRef {
    /// File the reference points into.
    pub fn path(&self) -> &Path {
        match self {
            SourceRef::File(path) | SourceRef::Key { path, .. } => path,
        }
    }

    /// Field to read, falling back to `default_key`.
    pub fn key_or<'a>(&'a self, default_key: &'a str) -> &'a str {
        match self {
            SourceRef::Key { key: Some(key), .. } => key.as_str(),
            _ => default_key,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceRef::File(path) => write!(f, "{}", path.display()),
            SourceRef::Key { path, key, .. } => match key {
                Some(key) => write!(f, "{}#{}", path.display(), key),
                None => write!(f, "{}", path.display()),
            },
        }
    }
}

/// Resolves a source reference to raw text.
pub trait Fetch {
    fn fetch(&self, source: &SourceRef, default_key: &str) -> Result<String, String>;
}

impl<F> Fetch for F
where
    F: Fn(&SourceRef, &str) -> Result<String, String>,
{
    fn fetch(&self, source: &SourceRef, default_key: &str) -> Result<String, String> {
        self(source, default_key)
    }
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    /// Directory relative paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl FileSource {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        FileSource { base_dir }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn fetch_key(&self, path: &Path, key: &str, optional: bool) -> Result<String, String> {
        let resolved = self.resolve(path);
        let text = match fs::read_to_string(&resolved) {
            Ok(text) => text,
            Err(e) if optional && e.kind() == io::ErrorKind::NotFound => {
                log::debug!("optional source '{}' not found", resolved.display());
                return Ok(String::new());
            }
            Err(e) => return Err(format!("cannot read '{}': {}", resolved.display(), e)),
        };

        let data = parse_yaml(&text)
            .map_err(|e| format!("cannot parse '{}': {}", resolved.display(), e))?;
        let field = match &data {
            Value::Mapping(map) => map.get(&Value::String(key.to_string())),
            Value::Null => None,
            _ => {
                return Err(format!(
                    "'{}' is not a mapping of fields",
                    resolved.display()
                ))
            }
        };

        match field {
            Some(value) => scalar_to_string(value).ok_or_else(|| {
                format!(
                    "field '{}' of '{}' is not a scalar",
                    key,
                    resolved.display()
                )
            }),
            None if optional => {
                log::debug!(
                    "optional field '{}' missing from '{}'",
                    key,
                    resolved.display()
                );
                Ok(String::new())
            }
            None => Err(format!(
                "missing field '{}' in '{}'",
                key,
                resolved.display()
            )),
        }
    }
}

impl Fetch for FileSource {
    fn fetch(&self, source: &SourceRef, default_key: &str) -> Result<String, String> {
        match source {
            SourceRef::File(path) => {
                let resolved = self.resolve(path);
                fs::read_to_string(&resolved)
                    .map_err(|e| format!("cannot read '{}': {}", resolved.display(), e))
            }
            SourceRef::Key { optional, .. } => {
                self.fetch_key(source.path(), source.key_or(default_key), *optional)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
