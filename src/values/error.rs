//! Error types for values composition.

use std::io;

/// Error type for values composition.
#[derive(Debug)]
pub enum Error {
    /// Path expression could not be parsed
    MalformedPath(String),
    /// Path traversal hit a value of the wrong kind
    TypeConflict(String),
    /// A value source could not be read
    SourceFetch(String),
    /// A source or inline blob is not a valid values document
    Decode(String),
    /// An override resolved to an empty value (carries the override path)
    MissingValue(String),
    /// An override could not be applied
    Set { path: String, cause: Box<Error> },
    /// I/O error
    Io(String),
    /// Generic error
    Base(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Set { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Base(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Base(e.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedPath(e) | Error::TypeConflict(e) => write!(f, "{}", e),
            Error::SourceFetch(e) => write!(f, "failed to get value from source: {}", e),
            Error::Decode(e) => write!(f, "failed to unmarshal desired values: {}", e),
            Error::MissingValue(path) => write!(f, "missing value for --set '{}'", path),
            Error::Set { path, cause } => {
                write!(f, "failed parsing --set data for '{}': {}", path, cause)
            }
            Error::Io(e) => write!(f, "{}", e),
            Error::Base(e) => write!(f, "{}", e),
        }
    }
}
