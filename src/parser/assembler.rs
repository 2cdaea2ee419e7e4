//! Batch assembler
//!
//! Drives the [`Normalizer`] over every observation of a saved feed file and
//! concatenates the rows. A record with a missing or malformed field is
//! logged and skipped; it never drops the rest of its date group.

use super::groups::extract_groups;
use super::normalizer::{AsteroidParser, Normalizer};
use super::types::{ContentProvider, RawSource, RecordParser};
use crate::error::Result;
use crate::model::AsteroidRecord;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Counters describing one assembly pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    /// Date groups visited
    pub dates: usize,
    /// Records turned into rows
    pub parsed: usize,
    /// Records dropped because they failed to parse
    pub skipped: usize,
}

/// Rows produced by one assembly pass, with its counters
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Rows in group order, then in-group order
    pub records: Vec<AsteroidRecord>,
    pub summary: ProcessSummary,
}

/// Reads saved feed files and flattens them into rows
#[derive(Debug, Clone)]
pub struct BatchAssembler<C> {
    provider: C,
}

impl<C: ContentProvider> BatchAssembler<C> {
    /// Create an assembler reading files through `provider`
    pub fn new(provider: C) -> Self {
        Self { provider }
    }

    /// The content provider in use
    pub fn provider(&self) -> &C {
        &self.provider
    }

    /// Flatten every observation in `file_name`
    ///
    /// A missing file, an undecodable file, or a payload with no dates is
    /// not an error: the result is simply empty.
    pub fn process_file(&self, file_name: &str) -> Result<Vec<AsteroidRecord>> {
        Ok(self.process_file_with_summary(file_name)?.records)
    }

    /// Like [`process_file`](Self::process_file), also returning counters
    pub fn process_file_with_summary(&self, file_name: &str) -> Result<ProcessOutput> {
        let Some(content) = self.provider.read_parsed_content(file_name)? else {
            warn!(file = file_name, "No content available, nothing to process");
            return Ok(ProcessOutput::default());
        };

        let output = assemble_records(&content)?;
        debug!(
            file = file_name,
            dates = output.summary.dates,
            parsed = output.summary.parsed,
            skipped = output.summary.skipped,
            "Processed feed file"
        );
        Ok(output)
    }
}

/// Flatten every observation of an already decoded feed payload
pub fn assemble_records(content: &Value) -> Result<ProcessOutput> {
    assemble_records_with(content, AsteroidParser)
}

/// Flatten a decoded payload with a custom parsing rule
///
/// Missing or invalid fields skip the record. Any other parse error aborts
/// the pass and is returned.
pub fn assemble_records_with<P>(content: &Value, parser: P) -> Result<ProcessOutput>
where
    P: RecordParser<Output = AsteroidRecord>,
{
    let Some(groups) = extract_groups(content) else {
        warn!("Payload has no near-Earth-object groups");
        return Ok(ProcessOutput::default());
    };

    let mut output = ProcessOutput::default();
    let mut normalizer = Normalizer::with_parser(parser, RawSource::empty());

    for group in groups {
        output.summary.dates += 1;

        for record in group.observations {
            normalizer.set_source(RawSource::Single(record.clone()));

            match normalizer.next() {
                Some(Ok(row)) => {
                    output.records.push(row);
                    output.summary.parsed += 1;
                }
                Some(Err(e)) if e.is_record_error() => {
                    warn!(
                        date = group.date,
                        error = %e,
                        record = %record,
                        "Skipping unparsable record"
                    );
                    output.summary.skipped += 1;
                }
                Some(Err(e)) => return Err(e),
                None => {}
            }
        }
    }

    Ok(output)
}
