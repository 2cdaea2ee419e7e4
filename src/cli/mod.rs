//! CLI module
//!
//! Command-line interface for the ETL.
//!
//! # Commands
//!
//! - `extract` - Fetch a date range and save it
//! - `load` - Load a saved file into the database
//! - `create` - Create the destination table
//! - `pipeline` - Extract then load
//! - `files` - List saved files
//! - `parse` - Print flattened records without loading

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
