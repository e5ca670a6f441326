//! Safe path extraction over nested JSON
//!
//! A [`FieldPath`] is a dotted path with optional array indices, such as
//! `venue.id`, `teams[0].name` or `events[0].start.millis`. Extraction never
//! fails: a missing key, an index past the end of an array, or a scalar where
//! an object or array was expected all yield `None`.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a [`FieldPath`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Object member lookup
    Key(String),
    /// Array element lookup
    Index(usize),
}

/// Parsed dotted path into a JSON value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a dotted path such as `teams[1].abbreviation`
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(open) => (&part[..open], &part[open..]),
                None => (part, ""),
            };
            if key.is_empty() {
                return Err(invalid("empty key"));
            }
            segments.push(Segment::Key(key.to_string()));

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed `[`"))?;
                if !rest.starts_with('[') {
                    return Err(invalid("unexpected text after `]`"));
                }
                let index: usize = rest[1..close]
                    .trim()
                    .parse()
                    .map_err(|_| invalid("array index is not a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments, outermost first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Descend into `value`; `None` as soon as a step cannot be taken
    pub fn extract<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => current.as_object()?.get(key),
                Segment::Index(index) => current.as_array()?.get(*index),
            })
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
