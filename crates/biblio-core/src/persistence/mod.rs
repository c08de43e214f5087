//! Persistence layer for biblio state
//!
//! Provides SQLite-backed storage: a `Projects` registry plus one source table
//! per project, all reached through a single serialized connection.

mod gate;
mod records;
mod repository;
pub mod schema;

pub use gate::ConnectionGate;
pub use repository::{ReconcileReport, Repository};
pub(crate) use repository::remove_project;
pub(crate) use records::update_project;
