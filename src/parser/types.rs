//! Parser types and traits
//!
//! Defines the record source variant and the seams the assembler is
//! generic over.

use crate::error::{Error, Result};
use serde_json::Value;

/// Raw records a [`Normalizer`](super::Normalizer) pulls from
///
/// The shape is decided once, at the call boundary, instead of being
/// inspected on every pull.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSource {
    /// A single raw observation
    Single(Value),
    /// Any number of raw observations, pulled in order
    Many(Vec<Value>),
}

impl Default for RawSource {
    fn default() -> Self {
        Self::empty()
    }
}

impl RawSource {
    /// A source with nothing to pull
    pub fn empty() -> Self {
        Self::Many(Vec::new())
    }

    /// Classify a dynamic JSON value
    ///
    /// An object becomes `Single`, an array of objects becomes `Many`.
    /// Anything else is rejected here rather than on the first pull.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self::Single(value)),
            Value::Array(items) => {
                if let Some((index, item)) = items.iter().enumerate().find(|(_, v)| !v.is_object())
                {
                    return Err(Error::invalid_source(format!(
                        "element {index} is {}, expected an object",
                        json_kind(item)
                    )));
                }
                Ok(Self::Many(items))
            }
            other => Err(Error::invalid_source(format!(
                "expected an object or an array of objects, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Number of raw records in the source
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    /// True when the source holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_records(self) -> Vec<Value> {
        match self {
            Self::Single(value) => vec![value],
            Self::Many(items) => items,
        }
    }
}

impl TryFrom<Value> for RawSource {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Rule turning one raw record into one output row
///
/// Implementations must not swallow their own failures; the caller decides
/// whether a bad record aborts the batch.
pub trait RecordParser {
    /// Row type produced for each raw record
    type Output;

    /// Parse a single raw record
    fn parse(&self, record: &Value) -> Result<Self::Output>;
}

/// Source of previously saved feed payloads
pub trait ContentProvider {
    /// Read and decode the payload stored under `file_name`
    ///
    /// Returns `Ok(None)` when the file is missing or cannot be decoded.
    fn read_parsed_content(&self, file_name: &str) -> Result<Option<Value>>;
}

impl<F> ContentProvider for F
where
    F: Fn(&str) -> Result<Option<Value>>,
{
    fn read_parsed_content(&self, file_name: &str) -> Result<Option<Value>> {
        self(file_name)
    }
}

/// Human-readable name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
