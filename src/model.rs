//! Flattened asteroid row
//!
//! The single-level shape every raw feed observation is normalized into
//! before it is written to the destination table.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column names of the destination table, in insert order
pub const COLUMNS: [&str; 9] = [
    "asteroid_id",
    "neo_reference_id",
    "absolute_magnitude",
    "estimated_diameter_km_max",
    "estimated_diameter_km_min",
    "is_hazardous",
    "close_approach_date",
    "miss_distance_km",
    "uploaded_date",
];

/// One flattened near-Earth-object observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidRecord {
    /// Feed `id`
    pub asteroid_id: i64,
    pub neo_reference_id: i64,
    /// Feed `absolute_magnitude_h`
    pub absolute_magnitude: f64,
    pub estimated_diameter_km_max: f64,
    pub estimated_diameter_km_min: f64,
    /// Feed `is_potentially_hazardous_asteroid`
    pub is_hazardous: bool,
    /// Date of the first close approach listed for the observation
    pub close_approach_date: NaiveDate,
    pub miss_distance_km: f64,
    /// Wall-clock time the record was normalized, not a feed value
    pub uploaded_date: NaiveDateTime,
}

impl AsteroidRecord {
    /// Compare every field except `uploaded_date`
    pub fn same_observation(&self, other: &Self) -> bool {
        self.asteroid_id == other.asteroid_id
            && self.neo_reference_id == other.neo_reference_id
            && self.absolute_magnitude == other.absolute_magnitude
            && self.estimated_diameter_km_max == other.estimated_diameter_km_max
            && self.estimated_diameter_km_min == other.estimated_diameter_km_min
            && self.is_hazardous == other.is_hazardous
            && self.close_approach_date == other.close_approach_date
            && self.miss_distance_km == other.miss_distance_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn sample() -> AsteroidRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        AsteroidRecord {
            asteroid_id: 123,
            neo_reference_id: 456,
            absolute_magnitude: 20.1,
            estimated_diameter_km_max: 0.5,
            estimated_diameter_km_min: 0.2,
            is_hazardous: false,
            close_approach_date: date,
            miss_distance_km: 1_000_000.0,
            uploaded_date: date.and_time(NaiveTime::MIN),
        }
    }

    #[test]
    fn test_same_observation_ignores_upload_time() {
        let a = sample();
        let mut b = sample();
        b.uploaded_date = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        assert_ne!(a, b);
        assert!(a.same_observation(&b));

        b.miss_distance_km = 1.0;
        assert!(!a.same_observation(&b));
    }

    #[test]
    fn test_serializes_with_column_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), COLUMNS.len());
        for column in COLUMNS {
            assert!(object.contains_key(column), "missing column {column}");
        }
        assert_eq!(value["close_approach_date"], "2024-01-01");
    }
}
