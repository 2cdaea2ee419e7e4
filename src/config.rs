//! Runtime settings
//!
//! Settings are read from a YAML file (or JSON, by extension) with every
//! field defaulted, so an empty file is valid. The API key can also come
//! from the `NEOWS_API_KEY` environment variable, which wins over the file.

use crate::database::is_valid_table_name;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::{LoadMode, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api_key`
pub const API_KEY_ENV: &str = "NEOWS_API_KEY";

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "neows.yaml";

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// NeoWs API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Feed endpoint
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Directory holding saved feed payloads
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Destination database settings
    #[serde(default)]
    pub database: DatabaseSettings,
}

fn default_feed_url() -> String {
    "https://api.nasa.gov/neo/rest/v1/feed".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/json_files")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            feed_url: default_feed_url(),
            data_dir: default_data_dir(),
            http: HttpSettings::default(),
            database: DatabaseSettings::default(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// `http` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
        }
    }
}

impl HttpSettings {
    /// Build the HTTP client config for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_seconds));
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Database Settings
// ============================================================================

/// `database` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// DuckDB file, or `:memory:`
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Destination table
    #[serde(default = "default_table")]
    pub table: String,

    /// Append to or replace the table contents on load
    #[serde(default)]
    pub load_mode: LoadMode,
}

fn default_database_path() -> String {
    "./data/neows.duckdb".to_string()
}

fn default_table() -> String {
    "asteroids_details".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            table: default_table(),
            load_mode: LoadMode::default(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Load settings from a file; `.json` files are parsed as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!("Failed to read config file '{}': {e}", path.display()))
            }
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Resolve settings for a run
    ///
    /// An explicit path must exist. Without one, `neows.yaml` in the working
    /// directory is used when present, defaults otherwise. Environment
    /// overrides are applied and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().none_if_empty() {
            self.api_key = Some(key);
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.feed_url).map_err(|e| Error::InvalidConfigValue {
            field: "feed_url".to_string(),
            message: e.to_string(),
        })?;

        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfigValue {
                field: "data_dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(Error::InvalidConfigValue {
                field: "database.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if !is_valid_table_name(&self.database.table) {
            return Err(Error::InvalidConfigValue {
                field: "database.table".to_string(),
                message: format!("'{}' is not a plain identifier", self.database.table),
            });
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::InvalidConfigValue {
                field: "http.timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// The API key, or an error naming the missing setting
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::missing_config("api_key"))
    }
}
