//! Server configuration
//!
//! Read from the TOML file named by `BIBLIO_CONFIG` (if set), then overridden
//! field by field from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use biblio_core::{ConfigError, StoreConfig};

/// Environment variable naming a TOML config file
pub const CONFIG_ENV: &str = "BIBLIO_CONFIG";
pub const ADDR_ENV: &str = "BIBLIO_ADDR";
pub const DB_ENV: &str = "BIBLIO_DB";
pub const FRONTEND_ENV: &str = "BIBLIO_FRONTEND_DIR";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub addr: String,
    /// Directory of the built frontend, served for every non-API path
    pub frontend_dir: PathBuf,
    /// Storage settings
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:1960".to_string(),
            frontend_dir: PathBuf::from("../frontend/build"),
            store: StoreConfig::default(),
        }
    }
}

/// Failure to assemble the server configuration
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

impl ServerConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from `BIBLIO_CONFIG` and the process environment
    pub fn load() -> Result<Self, LoadError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an injectable variable lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoadError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| LoadError::Read { path: path.clone(), source })?;
                tracing::info!(path = %path.display(), "loaded config file");
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup(ADDR_ENV) {
            config.addr = addr;
        }
        if let Some(db) = lookup(DB_ENV) {
            config.store.db_path = PathBuf::from(db);
        }
        if let Some(dir) = lookup(FRONTEND_ENV) {
            config.frontend_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.addr.trim().is_empty() {
            return Err(ConfigError::MissingField("addr".to_string()));
        }
        self.store.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_with(env(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:1960");
        assert_eq!(config.store.db_path, PathBuf::from("data.db"));
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::load_with(env(&[
            (ADDR_ENV, "127.0.0.1:9000"),
            (DB_ENV, "/var/lib/biblio.db"),
            (FRONTEND_ENV, "/srv/www"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.store.db_path, PathBuf::from("/var/lib/biblio.db"));
        assert_eq!(config.frontend_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biblio.toml");
        std::fs::write(
            &path,
            "addr = \"127.0.0.1:4000\"\n\n[store]\nlock_timeout_ms = 100\n",
        )
        .unwrap();

        let config = ServerConfig::load_with(env(&[
            (CONFIG_ENV, path.to_str().unwrap()),
            (DB_ENV, "override.db"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:4000");
        assert_eq!(config.store.lock_timeout_ms, 100);
        assert_eq!(config.store.db_path, PathBuf::from("override.db"));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::load_with(env(&[(CONFIG_ENV, "/nonexistent/biblio.toml")]))
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_invalid_store_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biblio.toml");
        std::fs::write(&path, "[store]\nlock_timeout_ms = 0\n").unwrap();
        let err = ServerConfig::load_with(env(&[(CONFIG_ENV, path.to_str().unwrap())]))
            .unwrap_err();
        assert!(matches!(err, LoadError::Invalid(ConfigError::OutOfRange(_))));
    }
}
