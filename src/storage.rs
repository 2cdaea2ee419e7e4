//! Saved feed payloads
//!
//! Raw feed responses are kept as pretty-printed JSON files in one data
//! directory, named after the date range they cover.

use crate::dates::{format_date, resolve_end_date};
use crate::error::{Result, ResultExt};
use crate::parser::ContentProvider;
use chrono::NaiveDate;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix of every saved feed file name
pub const FILE_PREFIX: &str = "NeoWs_json";

/// Directory of saved feed payloads
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `dir` (created lazily on first save)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a date range, e.g. `NeoWs_json_2024-10-27_2024-11-03.json`
    pub fn file_name(start: NaiveDate, end: Option<NaiveDate>) -> String {
        let end = resolve_end_date(start, end);
        format!(
            "{FILE_PREFIX}_{}_{}.json",
            format_date(start),
            format_date(end)
        )
    }

    /// Full path of a stored file
    ///
    /// Bare names resolve inside the data directory; anything that already
    /// looks like a path is used as given.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        let path = Path::new(file_name);
        if path.is_absolute() || path.components().count() > 1 {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Write `data` under `file_name`, replacing any previous file
    pub async fn save(&self, file_name: &str, data: &Value) -> Result<PathBuf> {
        let path = self.path_for(file_name);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(data)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .with_context(|| format!("Failed to rename {}", path.display()))?;

        debug!(path = %path.display(), bytes = contents.len(), "Saved feed payload");
        Ok(path)
    }

    /// Names of saved `.json` files, sorted
    pub fn list_files(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_name()?.to_str().map(String::from))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl ContentProvider for JsonStore {
    fn read_parsed_content(&self, file_name: &str) -> Result<Option<Value>> {
        let path = self.path_for(file_name);

        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Feed file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // Invalid UTF-8 surfaces here as a JSON error
        match serde_json::from_slice(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Feed file is not valid JSON");
                Ok(None)
            }
        }
    }
}
