//! Path parsing for `--set` expressions.
//!
//! A path is a dot-separated list of segments, each segment being either a
//! plain key name or a key name followed by a bracketed list index:
//! `containers[0].resources.limits.cpu`.

use super::error::Error;
use regex::Regex;
use std::sync::OnceLock;

/// Largest list index a path may address.
///
/// Sequences are grown up to the index, so this bounds the allocation a
/// single override can trigger.
pub const MAX_INDEX: usize = 65535;

fn segment_regex() -> &'static Regex {
    static SEGMENT_RE: OnceLock<Regex> = OnceLock::new();
    SEGMENT_RE.get_or_init(|| Regex::new(r"^(.+)\[([0-9]+)\]$").expect("valid segment regex"))
}

/// One hop of a path: a key name, and a list index if the key holds a
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    /// Plain key segment.
    pub fn key(name: &str) -> Self {
        Segment {
            name: name.to_string(),
            index: None,
        }
    }

    /// Indexed segment, rejecting negative or oversized indices.
    pub fn indexed(name: &str, index: i64) -> Result<Self, Error> {
        if index < 0 {
            return Err(Error::MalformedPath(format!(
                "negative {} index not allowed in '{}'",
                index, name
            )));
        }
        let index = usize::try_from(index)
            .ok()
            .filter(|i| *i <= MAX_INDEX)
            .ok_or_else(|| index_too_large(name, index))?;
        Ok(Segment {
            name: name.to_string(),
            index: Some(index),
        })
    }
}

fn index_too_large(name: &str, index: impl std::fmt::Display) -> Error {
    Error::MalformedPath(format!(
        "index {} of '{}' exceeds the maximum of {}",
        index, name, MAX_INDEX
    ))
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Parse a single dot-free token into a segment.
///
/// Tokens matching `<name>[<digits>]` become indexed segments. Anything else,
/// including empty brackets or non-digit bracket content, is taken as a
/// literal key name.
pub fn parse_segment(raw: &str) -> Result<Segment, Error> {
    let captures = match segment_regex().captures(raw) {
        Some(c) => c,
        None => return Ok(Segment::key(raw)),
    };
    let name = &captures[1];
    let digits = &captures[2];
    let index: i64 = digits.parse().map_err(|_| index_too_large(name, digits))?;
    Segment::indexed(name, index)
}

/// Split a path on `.` and parse every segment.
///
/// The result always holds at least one segment; the last one is where the
/// value gets written.
pub fn parse_path(path: &str) -> Result<Vec<Segment>, Error> {
    path.split('.').map(parse_segment).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
