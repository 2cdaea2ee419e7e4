//! Destination database support via DuckDB
//!
//! Flattened asteroid rows are loaded into a single DuckDB table, stored in
//! a local file or kept in memory.

mod engine;

pub use engine::{create_table_sql, is_valid_table_name, DatabaseEngine, IN_MEMORY};
