//! Record parsing module
//!
//! Turns a saved NeoWs feed payload into flat [`AsteroidRecord`] rows.
//!
//! # Overview
//!
//! - `RawSource` - the records a [`Normalizer`] pulls from (one or many)
//! - `Normalizer` - lazy cursor yielding one parse result per raw record
//! - `AsteroidParser` - the field extraction rule for one observation
//! - `BatchAssembler` - walks every date group of a file and collects rows,
//!   skipping records that fail to parse
//!
//! [`AsteroidRecord`]: crate::model::AsteroidRecord

mod assembler;
mod groups;
mod normalizer;
mod types;

pub use assembler::{
    assemble_records, assemble_records_with, BatchAssembler, ProcessOutput, ProcessSummary,
};
pub use groups::{extract_groups, ObservationGroup, GROUPS_KEY};
pub use normalizer::{AsteroidParser, Normalizer};
pub use types::{ContentProvider, RawSource, RecordParser};
