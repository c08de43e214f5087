//! Project domain model
//!
//! A project is a password-protected, named collection of sources. The stored
//! record carries the password; everything that leaves the crate goes through
//! [`ProjectSummary`], which does not.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// A project as stored in the registry
#[derive(Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub password: String,
}

impl Project {
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            password: password.into(),
        }
    }

    /// Public representation, without the password
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What callers see of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        project.summary()
    }
}
