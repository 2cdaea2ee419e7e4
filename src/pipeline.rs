//! End-to-end ETL runs
//!
//! Ties the extractor, the saved-file store, the batch assembler and the
//! destination database together.

use crate::config::Settings;
use crate::database::DatabaseEngine;
use crate::dates::{parse_date, resolve_end_date};
use crate::error::{Error, Result};
use crate::extract::{ExtractOutcome, NeoWsExtractor};
use crate::parser::{BatchAssembler, ProcessSummary};
use crate::storage::JsonStore;
use crate::types::LoadMode;
use serde::Serialize;
use tracing::{info, warn};

/// What one load did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// File the rows came from
    pub file_name: String,
    /// Assembly counters
    pub summary: ProcessSummary,
    /// Rows written to the table
    pub inserted: usize,
}

impl LoadReport {
    fn empty(file_name: &str, summary: ProcessSummary) -> Self {
        Self {
            file_name: file_name.to_string(),
            summary,
            inserted: 0,
        }
    }
}

/// Result of a full extract-then-load run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub extract: ExtractOutcome,
    pub load: LoadReport,
}

/// Extract, transform and load pipeline
pub struct Pipeline {
    extractor: Option<NeoWsExtractor>,
    assembler: BatchAssembler<JsonStore>,
    engine: DatabaseEngine,
    load_mode: LoadMode,
}

impl Pipeline {
    /// Create a pipeline that reads from `store` and writes to `engine`
    ///
    /// Without an extractor only the load side is usable.
    pub fn new(store: JsonStore, engine: DatabaseEngine) -> Self {
        Self {
            extractor: None,
            assembler: BatchAssembler::new(store),
            engine,
            load_mode: LoadMode::default(),
        }
    }

    /// Build a pipeline from runtime settings
    ///
    /// The extractor is only configured when an API key is available.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = JsonStore::new(&settings.data_dir);
        let engine = DatabaseEngine::open(&settings.database.path, &settings.database.table)?;

        let mut pipeline = Self::new(store, engine).with_load_mode(settings.database.load_mode);
        if settings.require_api_key().is_ok() {
            pipeline = pipeline.with_extractor(NeoWsExtractor::from_settings(settings)?);
        }
        Ok(pipeline)
    }

    /// Attach a feed extractor
    pub fn with_extractor(mut self, extractor: NeoWsExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set how rows are written
    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    /// The saved-file store
    pub fn store(&self) -> &JsonStore {
        self.assembler.provider()
    }

    /// The destination database
    pub fn engine(&self) -> &DatabaseEngine {
        &self.engine
    }

    /// Fetch a date range and save it
    pub async fn extract(&self, start: &str, end: Option<&str>) -> Result<ExtractOutcome> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| Error::missing_config("api_key"))?;
        extractor.extract(start, end).await
    }

    /// Load the saved file covering a date range
    pub fn transform_and_load(&mut self, start: &str, end: Option<&str>) -> Result<LoadReport> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        let file_name = JsonStore::file_name(start, Some(resolve_end_date(start, end)));
        self.load_file(&file_name)
    }

    /// Flatten one saved file and write its rows
    ///
    /// A file yielding no rows leaves the database untouched.
    pub fn load_file(&mut self, file_name: &str) -> Result<LoadReport> {
        let output = self.assembler.process_file_with_summary(file_name)?;

        if output.records.is_empty() {
            warn!(file = file_name, "No records to load");
            return Ok(LoadReport::empty(file_name, output.summary));
        }

        self.engine.create_table()?;
        let inserted = match self.load_mode {
            LoadMode::Append => self.engine.bulk_insert(&output.records)?,
            LoadMode::Truncate => self.engine.replace_all(&output.records)?,
        };

        info!(
            file = file_name,
            table = self.engine.table(),
            inserted,
            skipped = output.summary.skipped,
            "Data inserted successfully"
        );

        Ok(LoadReport {
            file_name: file_name.to_string(),
            summary: output.summary,
            inserted,
        })
    }

    /// Extract a date range, then load it
    pub async fn run(&mut self, start: &str, end: Option<&str>) -> Result<RunReport> {
        let extract = self.extract(start, end).await?;
        // Load from where the extractor saved, not the assembler store
        let load = self.load_file(&extract.path.to_string_lossy())?;
        Ok(RunReport { extract, load })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("extractor", &self.extractor)
            .field("store", self.store())
            .field("engine", &self.engine)
            .field("load_mode", &self.load_mode)
            .finish()
    }
}
