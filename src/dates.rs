//! Feed date helpers
//!
//! The feed and the saved file names both use `YYYY-MM-DD` dates.

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Date format used by the feed API and saved file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days covered by a request when no end date is given
pub const DEFAULT_SPAN_DAYS: u64 = 7;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if !DATE_RE.is_match(value) {
        return Err(Error::invalid_date(value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| Error::invalid_date(value))
}

/// Format a date the way the feed expects it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// End date used when a request only names its start
pub fn default_end_date(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_days(Days::new(DEFAULT_SPAN_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Resolve an optional end date against its start
pub fn resolve_end_date(start: NaiveDate, end: Option<NaiveDate>) -> NaiveDate {
    end.unwrap_or_else(|| default_end_date(start))
}
