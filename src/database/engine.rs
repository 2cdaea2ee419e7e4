//! DuckDB-backed destination table
//!
//! Owns the connection to the destination database and the DDL/DML for the
//! flattened asteroid table.

use crate::error::{Error, Result};
use crate::model::{AsteroidRecord, COLUMNS};
use chrono::{NaiveDate, NaiveDateTime};
use duckdb::{params, Connection, Transaction};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Path value selecting an in-memory database
pub const IN_MEMORY: &str = ":memory:";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

static TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// True when `name` can be used as an unquoted table name
pub fn is_valid_table_name(name: &str) -> bool {
    TABLE_NAME_RE.is_match(name)
}

/// Destination database holding the asteroid table
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Connection,
    /// Destination table name
    table: String,
    /// Path the database was opened from (for logging)
    location: String,
}

impl DatabaseEngine {
    /// Open (or create) the database at `path`; `:memory:` opens a scratch one
    pub fn open(path: &str, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(Error::InvalidConfigValue {
                field: "database.table".to_string(),
                message: format!("'{table}' is not a plain identifier"),
            });
        }

        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)
        }
        .map_err(|e| Error::config(format!("Failed to open DuckDB database '{path}': {e}")))?;

        tracing::debug!(path, table = %table, "Opened database");

        Ok(Self {
            conn,
            table,
            location: path.to_string(),
        })
    }

    /// Open an in-memory database
    pub fn open_in_memory(table: impl Into<String>) -> Result<Self> {
        Self::open(IN_MEMORY, table)
    }

    /// Destination table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Where the database lives
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Check whether a table exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Create the destination table if it does not exist
    pub fn create_table(&self) -> Result<()> {
        self.conn.execute_batch(&create_table_sql(&self.table))?;
        tracing::info!(table = %self.table, "Table ready");
        Ok(())
    }

    /// Remove every row from the destination table
    pub fn truncate_table(&self) -> Result<()> {
        self.ensure_table()?;
        self.conn
            .execute_batch(&format!("DELETE FROM {};", self.table))?;
        Ok(())
    }

    /// Insert `records` in a single transaction
    ///
    /// Either every row lands or none does. An empty slice is a no-op.
    pub fn bulk_insert(&mut self, records: &[AsteroidRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.ensure_table()?;

        let tx = self.conn.transaction()?;
        let inserted = insert_rows(&tx, &self.table, records)?;
        tx.commit()?;

        tracing::debug!(table = %self.table, rows = inserted, "Inserted rows");
        Ok(inserted)
    }

    /// Replace the table contents with `records` in a single transaction
    pub fn replace_all(&mut self, records: &[AsteroidRecord]) -> Result<usize> {
        self.ensure_table()?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DELETE FROM {};", self.table))?;
        let inserted = insert_rows(&tx, &self.table, records)?;
        tx.commit()?;

        Ok(inserted)
    }

    /// Number of rows in the destination table
    pub fn count_rows(&self) -> Result<usize> {
        self.ensure_table()?;
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// Read every row back, in insertion order
    pub fn fetch_records(&self) -> Result<Vec<AsteroidRecord>> {
        self.ensure_table()?;

        let sql = format!(
            "SELECT asteroid_id, neo_reference_id, absolute_magnitude, \
             estimated_diameter_km_max, estimated_diameter_km_min, is_hazardous, \
             CAST(close_approach_date AS VARCHAR), miss_distance_km, \
             CAST(uploaded_date AS VARCHAR) \
             FROM {} ORDER BY rowid",
            self.table
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, f64>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, neo_id, magnitude, max, min, hazardous, date, miss, uploaded) = row?;
            records.push(AsteroidRecord {
                asteroid_id: id,
                neo_reference_id: neo_id,
                absolute_magnitude: magnitude,
                estimated_diameter_km_max: max,
                estimated_diameter_km_min: min,
                is_hazardous: hazardous,
                close_approach_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|e| Error::Other(format!("Bad date '{date}' in table: {e}")))?,
                miss_distance_km: miss,
                uploaded_date: NaiveDateTime::parse_from_str(&uploaded, "%Y-%m-%d %H:%M:%S%.f")
                    .map_err(|e| Error::Other(format!("Bad timestamp '{uploaded}' in table: {e}")))?,
            });
        }

        Ok(records)
    }

    fn ensure_table(&self) -> Result<()> {
        if self.table_exists(&self.table)? {
            Ok(())
        } else {
            Err(Error::TableNotFound {
                table: self.table.clone(),
            })
        }
    }
}

impl std::fmt::Debug for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseEngine")
            .field("location", &self.location)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// DDL for the destination table
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         asteroid_id BIGINT NOT NULL, \
         neo_reference_id BIGINT NOT NULL, \
         absolute_magnitude DOUBLE NOT NULL, \
         estimated_diameter_km_max DOUBLE NOT NULL, \
         estimated_diameter_km_min DOUBLE NOT NULL, \
         is_hazardous BOOLEAN NOT NULL, \
         close_approach_date DATE NOT NULL, \
         miss_distance_km DOUBLE NOT NULL, \
         uploaded_date TIMESTAMP NOT NULL\
         );"
    )
}

fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} ({}) VALUES (?, ?, ?, ?, ?, ?, CAST(? AS DATE), ?, CAST(? AS TIMESTAMP))",
        COLUMNS.join(", ")
    )
}

fn insert_rows(tx: &Transaction<'_>, table: &str, records: &[AsteroidRecord]) -> Result<usize> {
    let mut stmt = tx.prepare(&insert_sql(table))?;
    let mut inserted = 0;

    for record in records {
        inserted += stmt.execute(params![
            record.asteroid_id,
            record.neo_reference_id,
            record.absolute_magnitude,
            record.estimated_diameter_km_max,
            record.estimated_diameter_km_min,
            record.is_hazardous,
            record.close_approach_date.format("%Y-%m-%d").to_string(),
            record.miss_distance_km,
            record.uploaded_date.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    Ok(inserted)
}
