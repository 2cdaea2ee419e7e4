//! Normalizer cursor and the asteroid parsing rule

use super::types::{json_kind, RawSource, RecordParser};
use crate::error::{Error, Result};
use crate::model::AsteroidRecord;
use chrono::{Local, NaiveDate};
use serde_json::Value;

// ============================================================================
// Normalizer
// ============================================================================

/// Single-pass cursor over a [`RawSource`]
///
/// Every pull takes the next raw record and yields the parser's result for
/// it, so one bad record produces one `Err` item and nothing else. The
/// cursor cannot be rewound; assigning a new source with
/// [`set_source`](Self::set_source) discards whatever was left of the old one.
#[derive(Debug)]
pub struct Normalizer<P = AsteroidParser> {
    parser: P,
    records: std::vec::IntoIter<Value>,
}

impl Normalizer<AsteroidParser> {
    /// Create a normalizer using the asteroid parsing rule
    pub fn new(source: RawSource) -> Self {
        Self::with_parser(AsteroidParser, source)
    }
}

impl Default for Normalizer<AsteroidParser> {
    fn default() -> Self {
        Self::new(RawSource::empty())
    }
}

impl<P: RecordParser> Normalizer<P> {
    /// Create a normalizer with a custom parsing rule
    pub fn with_parser(parser: P, source: RawSource) -> Self {
        Self {
            parser,
            records: source.into_records().into_iter(),
        }
    }

    /// Replace the current source
    pub fn set_source(&mut self, source: RawSource) {
        self.records = source.into_records().into_iter();
    }

    /// Classify `value` and make it the current source
    ///
    /// On error the previous source is left untouched.
    pub fn try_set_source(&mut self, value: Value) -> Result<()> {
        let source = RawSource::from_value(value)?;
        self.set_source(source);
        Ok(())
    }

    /// Raw records not yet pulled
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// The parsing rule in use
    pub fn parser(&self) -> &P {
        &self.parser
    }
}

impl<P: RecordParser> Iterator for Normalizer<P> {
    type Item = Result<P::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(self.parser.parse(&record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl<P: RecordParser> ExactSizeIterator for Normalizer<P> {}

impl<P: RecordParser> std::iter::FusedIterator for Normalizer<P> {}

// ============================================================================
// Asteroid parsing rule
// ============================================================================

const ID: &str = "id";
const NEO_REFERENCE_ID: &str = "neo_reference_id";
const ABSOLUTE_MAGNITUDE: &str = "absolute_magnitude_h";
const DIAMETER_MAX: &str = "estimated_diameter.kilometers.estimated_diameter_max";
const DIAMETER_MIN: &str = "estimated_diameter.kilometers.estimated_diameter_min";
const HAZARDOUS: &str = "is_potentially_hazardous_asteroid";
const APPROACH_DATE: &str = "close_approach_data[0].close_approach_date";
const MISS_DISTANCE: &str = "close_approach_data[0].miss_distance.kilometers";

/// Flattens one NeoWs feed observation into an [`AsteroidRecord`]
///
/// `uploaded_date` is stamped with the local wall clock at parse time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsteroidParser;

impl RecordParser for AsteroidParser {
    type Output = AsteroidRecord;

    fn parse(&self, record: &Value) -> Result<AsteroidRecord> {
        Ok(AsteroidRecord {
            asteroid_id: integer_at(record, ID)?,
            neo_reference_id: integer_at(record, NEO_REFERENCE_ID)?,
            absolute_magnitude: float_at(record, ABSOLUTE_MAGNITUDE)?,
            estimated_diameter_km_max: float_at(record, DIAMETER_MAX)?,
            estimated_diameter_km_min: float_at(record, DIAMETER_MIN)?,
            is_hazardous: bool_at(record, HAZARDOUS)?,
            close_approach_date: date_at(record, APPROACH_DATE)?,
            miss_distance_km: float_at(record, MISS_DISTANCE)?,
            uploaded_date: Local::now().naive_local(),
        })
    }
}

/// Follow a dot path with optional `[n]` indexing, e.g. `items[0].name`
fn lookup<'a>(record: &'a Value, path: &str) -> Result<&'a Value> {
    let mut current = record;

    for part in path.split('.') {
        let (name, index) = match part.find('[') {
            Some(bracket_pos) => {
                let index = part[bracket_pos + 1..]
                    .strip_suffix(']')
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(|| Error::invalid_field(path, "bad index in field path"))?;
                (&part[..bracket_pos], Some(index))
            }
            None => (part, None),
        };

        current = match current {
            Value::Object(map) => map.get(name).ok_or_else(|| Error::missing_field(path))?,
            other => {
                return Err(Error::invalid_field(
                    path,
                    format!("cannot look up '{name}' in {}", json_kind(other)),
                ))
            }
        };

        if let Some(index) = index {
            current = match current {
                Value::Array(items) => items.get(index).ok_or_else(|| Error::missing_field(path))?,
                other => {
                    return Err(Error::invalid_field(
                        path,
                        format!("expected an array at '{name}', got {}", json_kind(other)),
                    ))
                }
            };
        }
    }

    Ok(current)
}

fn integer_at(record: &Value, path: &str) -> Result<i64> {
    match lookup(record, path)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::invalid_field(path, format!("{n} is not an integer"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_field(path, format!("'{s}' is not an integer"))),
        other => Err(Error::invalid_field(
            path,
            format!("expected an integer, got {}", json_kind(other)),
        )),
    }
}

fn float_at(record: &Value, path: &str) -> Result<f64> {
    let value = match lookup(record, path)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::invalid_field(path, format!("{n} is not a float")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid_field(path, format!("'{s}' is not a number")))?,
        other => {
            return Err(Error::invalid_field(
                path,
                format!("expected a number, got {}", json_kind(other)),
            ))
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_field(path, "value is not finite"))
    }
}

fn bool_at(record: &Value, path: &str) -> Result<bool> {
    match lookup(record, path)? {
        Value::Bool(b) => Ok(*b),
        other => Err(Error::invalid_field(
            path,
            format!("expected a boolean, got {}", json_kind(other)),
        )),
    }
}

fn date_at(record: &Value, path: &str) -> Result<NaiveDate> {
    match lookup(record, path)? {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| Error::invalid_field(path, format!("'{s}' is not a date: {e}"))),
        other => Err(Error::invalid_field(
            path,
            format!("expected a date string, got {}", json_kind(other)),
        )),
    }
}
