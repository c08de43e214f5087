//! Biblio Core - storage for password-protected bibliography projects
//!
//! This crate provides the data-access core of the biblio server:
//!
//! - **Ids**: random UUID identifiers and the validated `ProjectId`
//! - **Project / Source**: the two record kinds, with a password-free public view
//! - **Persistence**: a `Projects` registry plus one source table per project,
//!   reached through a single serialized SQLite connection
//! - **Guard**: the password check in front of project updates and deletes
//! - **Service**: the validated operation set consumed by the HTTP layer
//! - **Config**: database location and connection wait limits
//!
//! # Layout on disk
//!
//! ```text
//! data.db
//! ├── Projects                      (id, name, description, password)
//! ├── <project id>                  (id, tag, url, author, title, date_accessed, date_published)
//! └── <project id> ...
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod ids;
pub mod payload;
pub mod persistence;
pub mod project;
pub mod service;
pub mod source;

pub use config::StoreConfig;
pub use error::{BiblioError, ConfigError, Result};
pub use guard::check_password;
pub use ids::{new_id, ProjectId};
pub use payload::{NewProject, ProjectUpdate, SourcePayload};
pub use persistence::{ConnectionGate, ReconcileReport, Repository};
pub use project::{Project, ProjectSummary};
pub use service::BibliographyService;
pub use source::Source;
