//! Error types for biblio-core

use std::time::Duration;

use thiserror::Error;

/// Result type alias for biblio operations
pub type Result<T> = std::result::Result<T, BiblioError>;

/// Main error type for biblio operations
#[derive(Error, Debug)]
pub enum BiblioError {
    /// A create/update payload is missing a required field or carries a malformed one
    #[error("Validation error: {0}")]
    Validation(String),

    /// No registry row for this project id
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// The project exists but holds no source with this id
    #[error("Source {source_id} not found in project {project_id}")]
    SourceNotFound {
        project_id: String,
        source_id: String,
    },

    /// Supplied password does not match the stored one
    #[error("Invalid password for project {0}")]
    Unauthorized(String),

    /// A caller-supplied id collides with an existing record
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Underlying database or disk failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// The serialization gate could not be acquired in time
    #[error("Timed out after {0:?} waiting for the database connection")]
    Timeout(Duration),
}

impl BiblioError {
    /// True for both project and source not-found conditions
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BiblioError::ProjectNotFound(_) | BiblioError::SourceNotFound { .. }
        )
    }
}

impl From<rusqlite::Error> for BiblioError {
    fn from(err: rusqlite::Error) -> Self {
        BiblioError::Storage(err.to_string())
    }
}

/// Configuration validation error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The config text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
