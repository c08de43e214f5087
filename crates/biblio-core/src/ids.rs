//! Identifier generation and project id validation
//!
//! Project ids double as table names, so they only enter the schema layer as a
//! [`ProjectId`], which can only hold a canonical lowercase hyphenated UUID.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::BiblioError;

/// Length of the canonical hyphenated form
const CANONICAL_LEN: usize = 36;

/// Generate a fresh opaque identifier for a project or source
pub fn new_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Unique identifier for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId {
    /// The underlying UUID value
    pub value: Uuid,
}

impl ProjectId {
    /// Create a new random project ID
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
        }
    }

    /// Parse an untrusted project id.
    ///
    /// Only the canonical form produced by [`new_id`] is accepted: 36 characters,
    /// lowercase hex with hyphens. Uppercase, braced, URN and simple forms are
    /// rejected rather than normalized so the stored id always equals the
    /// caller's string.
    pub fn parse(s: &str) -> Result<Self, BiblioError> {
        let invalid = || BiblioError::Validation(format!("malformed project id: {:?}", s));

        if s.len() != CANONICAL_LEN {
            return Err(invalid());
        }
        let value = Uuid::parse_str(s).map_err(|_| invalid())?;
        if value.hyphenated().to_string() != s {
            return Err(invalid());
        }
        Ok(Self { value })
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.hyphenated())
    }
}

impl FromStr for ProjectId {
    type Err = BiblioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
