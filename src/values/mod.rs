//! Values composition.
//!
//! Builds one values document out of layered YAML sources and `--set`
//! overrides, the way Helm's `--values` / `--set` flags do.
//!
//! # Module Organization
//!
//! - [`error`]: Error types
//! - [`path`]: Parsing of `--set` path expressions
//! - [`mutation`]: Writing a value at a path
//! - [`merge`]: Deep merge of documents
//! - [`source`]: Source references and the file-backed fetcher
//! - [`compose`]: Layering sources, inline values and overrides
//! - [`manifest`]: Loading a composition from a YAML manifest
//! - [`serialize`]: Decoding and serialization utilities

mod compose;
mod error;
mod manifest;
pub mod merge;
mod mutation;
mod path;
mod serialize;
mod source;

// Re-export fyaml types
pub use fyaml::Value;

// Re-export error type
pub use error::Error;

pub use compose::{compose_values, SetOverride, ValuesSpec};
pub use merge::merge;
pub use mutation::set_value;
pub use serialize::{decode_document, serialize};
pub use source::{FileSource, SourceRef};

/// Get the fyaml C library version.
pub fn get_version() -> Result<String, String> {
    fyaml::get_c_version().map_err(|e| e.to_string())
}
