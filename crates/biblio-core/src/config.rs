//! Configuration for biblio-core
//!
//! Where the database lives and how long callers may wait for the single
//! shared connection.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file
    pub db_path: PathBuf,
    /// Maximum wait for the connection gate before a call fails with a timeout
    pub lock_timeout_ms: u64,
    /// SQLite busy handler timeout for file-level locks held by other processes
    pub busy_timeout_ms: u64,
    /// Run the orphan-table reconciliation pass when the store is opened
    pub reconcile_on_open: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data.db"),
            lock_timeout_ms: 5_000,
            busy_timeout_ms: 5_000,
            reconcile_on_open: true,
        }
    }
}

impl StoreConfig {
    /// Defaults pointing at the given database file
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("db_path".to_string()));
        }

        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange(
                "lock_timeout_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
