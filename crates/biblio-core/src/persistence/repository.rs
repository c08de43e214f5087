//! Repository for CRUD operations on projects and their sources
//!
//! Every method is one trip through the [`ConnectionGate`]. Project creation
//! and deletion touch both the registry and the schema, and each runs as a
//! single transaction so a project row never outlives or predates its table.

use std::time::Duration;

use rusqlite::Connection;

use super::gate::ConnectionGate;
use super::{records, schema};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::ids::ProjectId;
use crate::project::Project;
use crate::source::Source;

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tables dropped because no registry row owned them
    pub dropped_tables: Vec<ProjectId>,
    /// Tables recreated for registry rows that had none
    pub restored_tables: Vec<ProjectId>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_tables.is_empty() && self.restored_tables.is_empty()
    }
}

/// Record store over the single shared connection
#[derive(Clone)]
pub struct Repository {
    gate: ConnectionGate,
}

impl Repository {
    /// Open (or create) the database described by `config`
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open(&config.db_path)?;
        conn.busy_timeout(config.busy_timeout())?;
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::debug!(journal_mode = %journal_mode, "configured journal");

        let repo = Self::with_connection(conn, config.lock_timeout()).await?;
        tracing::info!(path = %config.db_path.display(), "opened bibliography store");

        if config.reconcile_on_open {
            repo.reconcile().await?;
        }
        Ok(repo)
    }

    /// Create an in-memory repository (for testing)
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, StoreConfig::default().lock_timeout()).await
    }

    async fn with_connection(conn: Connection, lock_timeout: Duration) -> Result<Self> {
        let repo = Self {
            gate: ConnectionGate::new(conn, lock_timeout),
        };
        repo.gate
            .run("ensure_registry", |conn| schema::ensure_registry(conn))
            .await?;
        Ok(repo)
    }

    /// The serialization gate, for composite operations that must not interleave
    pub fn gate(&self) -> &ConnectionGate {
        &self.gate
    }

    // ==================== Project Operations ====================

    /// Create the project's table and registry row atomically
    pub async fn insert_project(&self, project: Project) -> Result<()> {
        self.gate
            .run("insert_project", move |conn| {
                let tx = conn.transaction()?;
                schema::create_project_table(&tx, &project.id)?;
                records::insert_project(&tx, &project)?;
                tx.commit()?;
                tracing::info!(project_id = %project.id, "created project");
                Ok(())
            })
            .await
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<Project> {
        self.gate
            .run("get_project", move |conn| records::get_project(conn, &id))
            .await
    }

    pub async fn project_exists(&self, id: ProjectId) -> Result<bool> {
        self.gate
            .run("project_exists", move |conn| {
                Ok(records::find_project(conn, &id)?.is_some())
            })
            .await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.gate
            .run("list_projects", |conn| records::list_projects(conn))
            .await
    }

    /// Replace name, description and password; `ProjectNotFound` if absent
    pub async fn update_project(&self, project: Project) -> Result<()> {
        self.gate
            .run("update_project", move |conn| {
                records::update_project(conn, &project)
            })
            .await
    }

    /// Remove the registry row and drop the table atomically
    pub async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.gate
            .run("delete_project", move |conn| {
                let tx = conn.transaction()?;
                remove_project(&tx, &id)?;
                tx.commit()?;
                Ok(())
            })
            .await
    }

    /// Load a project and run `mutate` on it in one gate slot and one transaction.
    ///
    /// `mutate` sees the stored record; returning an error rolls back anything
    /// it wrote. Password checks use this so the check and the change cannot be
    /// separated by another caller.
    pub async fn with_project<T, F>(
        &self,
        label: &'static str,
        id: ProjectId,
        mutate: F,
    ) -> Result<T>
    where
        F: FnOnce(&Connection, Project) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.gate
            .run(label, move |conn| {
                let tx = conn.transaction()?;
                let project = records::get_project(&tx, &id)?;
                let out = mutate(&tx, project)?;
                tx.commit()?;
                Ok(out)
            })
            .await
    }

    // ==================== Source Operations ====================

    pub async fn insert_source(&self, project_id: ProjectId, source: Source) -> Result<()> {
        self.gate
            .run("insert_source", move |conn| {
                records::require_project(conn, &project_id)?;
                records::insert_source(conn, &project_id, &source)
            })
            .await
    }

    pub async fn get_source(&self, project_id: ProjectId, source_id: String) -> Result<Source> {
        self.gate
            .run("get_source", move |conn| {
                records::require_project(conn, &project_id)?;
                records::get_source(conn, &project_id, &source_id)
            })
            .await
    }

    pub async fn list_sources(&self, project_id: ProjectId) -> Result<Vec<Source>> {
        self.gate
            .run("list_sources", move |conn| {
                records::require_project(conn, &project_id)?;
                records::list_sources(conn, &project_id)
            })
            .await
    }

    pub async fn update_source(&self, project_id: ProjectId, source: Source) -> Result<()> {
        self.gate
            .run("update_source", move |conn| {
                records::require_project(conn, &project_id)?;
                records::update_source(conn, &project_id, &source)
            })
            .await
    }

    pub async fn delete_source(&self, project_id: ProjectId, source_id: String) -> Result<()> {
        self.gate
            .run("delete_source", move |conn| {
                records::require_project(conn, &project_id)?;
                records::delete_source(conn, &project_id, &source_id)
            })
            .await
    }

    // ==================== Maintenance ====================

    /// Bring tables and registry rows back into one-to-one correspondence.
    ///
    /// Tables with no registry row are dropped; registry rows with no table get
    /// an empty one.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let report = self
            .gate
            .run("reconcile", |conn| {
                let tx = conn.transaction()?;
                let registered: Vec<ProjectId> = records::list_projects(&tx)?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                let tables = schema::project_tables(&tx)?;

                let mut report = ReconcileReport::default();
                for table in &tables {
                    if !registered.contains(table) {
                        schema::drop_project_table(&tx, table)?;
                        report.dropped_tables.push(*table);
                    }
                }
                for id in &registered {
                    if !tables.contains(id) {
                        schema::create_project_table(&tx, id)?;
                        report.restored_tables.push(*id);
                    }
                }
                tx.commit()?;
                Ok(report)
            })
            .await?;

        for id in &report.dropped_tables {
            tracing::info!(project_id = %id, "dropped orphaned source table");
        }
        for id in &report.restored_tables {
            tracing::info!(project_id = %id, "restored missing source table");
        }
        Ok(report)
    }
}

/// Registry delete + table drop; the caller supplies the transaction
pub(crate) fn remove_project(conn: &Connection, id: &ProjectId) -> Result<()> {
    records::delete_project_row(conn, id)?;
    schema::drop_project_table(conn, id)?;
    tracing::info!(project_id = %id, "deleted project");
    Ok(())
}
