// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # NeoWs ETL
//!
//! Extracts the NASA Near Earth Object Web Service (NeoWs) feed, keeps the
//! raw responses on disk, flattens each asteroid observation into one row
//! and loads the rows into a DuckDB table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use neows_etl::{config::Settings, pipeline::Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::load(None)?;
//!     let mut pipeline = Pipeline::from_settings(&settings)?;
//!
//!     let report = pipeline.run("2024-10-27", None).await?;
//!     println!("{} rows loaded", report.load.inserted);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────────────────────┐   ┌──────────┐
//! │ Extract  │ → │ JsonStore │ → │ Parser                   │ → │ Database │
//! │ HTTP+key │   │ raw JSON  │   │ groups → normalizer →    │   │ DuckDB   │
//! │          │   │ per range │   │ assembler (skip bad rows)│   │ table    │
//! └──────────┘   └───────────┘   └──────────────────────────┘   └──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Flattened asteroid row
pub mod model;

/// Date parsing and range defaults
pub mod dates;

/// Runtime settings
pub mod config;

/// Authentication for feed requests
pub mod auth;

/// HTTP client
pub mod http;

/// Record normalization and batch assembly
pub mod parser;

/// Saved feed payloads
pub mod storage;

/// Feed extraction
pub mod extract;

/// Destination database support via DuckDB
pub mod database;

/// End-to-end runs
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use model::AsteroidRecord;
pub use parser::{AsteroidParser, BatchAssembler, Normalizer, RawSource};
pub use pipeline::{LoadReport, Pipeline};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
