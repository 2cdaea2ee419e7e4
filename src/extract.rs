//! Feed extraction
//!
//! Fetches one date range from the NeoWs feed and saves the raw response
//! through a [`JsonStore`]. The feed serves at most seven days per request.

use crate::auth::AuthConfig;
use crate::config::Settings;
use crate::dates::{format_date, parse_date, resolve_end_date, DEFAULT_SPAN_DAYS};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::storage::JsonStore;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Result of one successful extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractOutcome {
    /// First day requested
    pub start: NaiveDate,
    /// Last day requested
    pub end: NaiveDate,
    /// Name the payload was saved under
    pub file_name: String,
    /// Where the payload was written
    pub path: PathBuf,
    /// Observation count reported by the feed, when present
    pub element_count: Option<u64>,
}

/// NeoWs feed extractor
#[derive(Debug)]
pub struct NeoWsExtractor {
    client: HttpClient,
    feed_url: String,
    store: JsonStore,
}

impl NeoWsExtractor {
    /// Create an extractor
    ///
    /// Fails with a missing-config error when `api_key` is blank.
    pub fn new(
        api_key: &str,
        feed_url: impl Into<String>,
        store: JsonStore,
        http: HttpClientConfig,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::missing_config("api_key"));
        }

        let client = HttpClient::with_auth(http, AuthConfig::api_key_query(api_key))?;
        Ok(Self {
            client,
            feed_url: feed_url.into(),
            store,
        })
    }

    /// Create an extractor from runtime settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require_api_key()?,
            settings.feed_url.clone(),
            JsonStore::new(&settings.data_dir),
            settings.http.client_config(),
        )
    }

    /// The store payloads are saved to
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Extract a range given as `YYYY-MM-DD` strings
    pub async fn extract(&self, start: &str, end: Option<&str>) -> Result<ExtractOutcome> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        self.extract_range(start, end).await
    }

    /// Fetch a date range and save the raw payload
    pub async fn extract_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<ExtractOutcome> {
        let end = resolve_end_date(start, end);
        let data = self.fetch(start, end).await?;

        let file_name = JsonStore::file_name(start, Some(end));
        let path = self.store.save(&file_name, &data).await?;
        let element_count = data.get("element_count").and_then(Value::as_u64);

        info!(
            start = %start,
            end = %end,
            path = %path.display(),
            element_count = ?element_count,
            "Extracted feed"
        );

        Ok(ExtractOutcome {
            start,
            end,
            file_name,
            path,
            element_count,
        })
    }

    /// Request one date range from the feed
    pub async fn fetch(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        validate_range(start, end)?;

        let request = RequestConfig::new()
            .query("start_date", format_date(start))
            .query("end_date", format_date(end));

        self.client.get_json_with_config(&self.feed_url, request).await
    }
}

/// Check a range against the feed's limits
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::InvalidDateRange {
            message: format!("end date {end} is before start date {start}"),
        });
    }

    let span = (end - start).num_days();
    if span > DEFAULT_SPAN_DAYS as i64 {
        return Err(Error::InvalidDateRange {
            message: format!("{span} days requested, the feed allows at most {DEFAULT_SPAN_DAYS}"),
        });
    }

    Ok(())
}
