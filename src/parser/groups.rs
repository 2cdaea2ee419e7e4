//! Date-keyed group extraction from a feed payload

use serde_json::Value;
use tracing::warn;

/// Key of the date → observations mapping in a feed response
pub const GROUPS_KEY: &str = "near_earth_objects";

/// All raw observations the feed listed under one calendar date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationGroup<'a> {
    /// Date key as written in the payload
    pub date: &'a str,
    /// Observations in payload order
    pub observations: &'a [Value],
}

/// Locate the per-date groups of a feed payload
///
/// Groups come back in payload order, which is whatever order the feed
/// wrote its date keys in; no chronological sort is applied. Returns `None`
/// when the mapping is absent, not an object, or empty. A date whose value
/// is not an array is skipped with a warning.
pub fn extract_groups(content: &Value) -> Option<Vec<ObservationGroup<'_>>> {
    let groups = content.get(GROUPS_KEY)?.as_object()?;
    if groups.is_empty() {
        return None;
    }

    let extracted = groups
        .iter()
        .filter_map(|(date, value)| match value {
            Value::Array(observations) => Some(ObservationGroup {
                date: date.as_str(),
                observations: observations.as_slice(),
            }),
            _ => {
                warn!(date = %date, "Observation group is not an array, skipping");
                None
            }
        })
        .collect();

    Some(extracted)
}

impl ObservationGroup<'_> {
    /// Number of observations in the group
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when the feed listed no observations for the date
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
