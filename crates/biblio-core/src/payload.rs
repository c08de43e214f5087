//! Request payloads accepted by the service facade
//!
//! Every field is optional at the decoding stage so that an absent field turns
//! into a [`BiblioError::Validation`] naming it, not an opaque decode failure.

use serde::Deserialize;

use crate::error::{BiblioError, Result};

/// Payload for creating a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    /// Caller-supplied id; generated when absent
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
}

/// Payload for replacing a project's mutable fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub id: Option<String>,
    /// Must match the stored password for the update to apply
    pub old_password: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// The new password
    pub password: Option<String>,
}

/// Payload for creating or replacing a source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePayload {
    /// Generated on create when absent; required on update
    pub id: Option<String>,
    pub tag: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub date_accessed: Option<String>,
    pub date_published: Option<String>,
}

/// Take a required field or fail naming it
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value.ok_or_else(|| BiblioError::Validation(format!("missing required field: {}", field)))
}

/// A caller-supplied source id, when present, must not be blank
pub(crate) fn source_id(value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(id) if id.trim().is_empty() => Err(BiblioError::Validation(
            "source id must not be empty".to_string(),
        )),
        other => Ok(other),
    }
}
