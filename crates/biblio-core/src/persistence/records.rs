//! Statement-level operations on the registry and source tables
//!
//! These run on a connection the caller already holds through the gate and
//! collect every row before returning.

use rusqlite::{params, Connection, OptionalExtension};

use super::schema::table_ident;
use crate::error::{BiblioError, Result};
use crate::ids::ProjectId;
use crate::project::Project;
use crate::source::Source;

fn constraint_or_storage(err: rusqlite::Error, what: impl FnOnce() -> String) -> BiblioError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            return BiblioError::AlreadyExists(what());
        }
    }
    BiblioError::from(err)
}

fn source_not_found(project_id: &ProjectId, source_id: &str) -> BiblioError {
    BiblioError::SourceNotFound {
        project_id: project_id.to_string(),
        source_id: source_id.to_string(),
    }
}

// ==================== Project Operations ====================

pub fn insert_project(conn: &Connection, project: &Project) -> Result<()> {
    conn.execute(
        "INSERT INTO Projects (id, name, description, password) VALUES (?1, ?2, ?3, ?4)",
        params![
            project.id.to_string(),
            project.name,
            project.description,
            project.password,
        ],
    )
    .map_err(|e| constraint_or_storage(e, || format!("project {}", project.id)))?;
    Ok(())
}

pub fn find_project(conn: &Connection, id: &ProjectId) -> Result<Option<Project>> {
    let found = conn
        .query_row(
            "SELECT name, description, password FROM Projects WHERE id = ?1",
            [id.to_string()],
            |row| {
                Ok(Project {
                    id: *id,
                    name: row.get(0)?,
                    description: row.get(1)?,
                    password: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(found)
}

pub fn get_project(conn: &Connection, id: &ProjectId) -> Result<Project> {
    find_project(conn, id)?.ok_or_else(|| BiblioError::ProjectNotFound(id.to_string()))
}

/// Fail with `ProjectNotFound` unless the registry has this id
pub fn require_project(conn: &Connection, id: &ProjectId) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Projects WHERE id = ?1)",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(BiblioError::ProjectNotFound(id.to_string()))
    }
}

/// All registry rows in insertion order.
///
/// Rows whose id is not a canonical project id cannot own a table and are
/// skipped.
pub fn list_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, password FROM Projects ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut projects = Vec::with_capacity(rows.len());
    for (raw_id, name, description, password) in rows {
        match ProjectId::parse(&raw_id) {
            Ok(id) => projects.push(Project {
                id,
                name,
                description,
                password,
            }),
            Err(_) => tracing::warn!(id = %raw_id, "skipping registry row with malformed id"),
        }
    }
    Ok(projects)
}

/// Replace name, description and password of an existing project
pub fn update_project(conn: &Connection, project: &Project) -> Result<()> {
    let rows = conn.execute(
        "UPDATE Projects SET name = ?1, description = ?2, password = ?3 WHERE id = ?4",
        params![
            project.name,
            project.description,
            project.password,
            project.id.to_string(),
        ],
    )?;
    if rows == 0 {
        return Err(BiblioError::ProjectNotFound(project.id.to_string()));
    }
    Ok(())
}

pub fn delete_project_row(conn: &Connection, id: &ProjectId) -> Result<()> {
    let rows = conn.execute("DELETE FROM Projects WHERE id = ?1", [id.to_string()])?;
    if rows == 0 {
        return Err(BiblioError::ProjectNotFound(id.to_string()));
    }
    Ok(())
}

// ==================== Source Operations ====================

pub fn insert_source(conn: &Connection, project_id: &ProjectId, source: &Source) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        table_ident(project_id),
        Source::COLUMNS
    );
    conn.execute(
        &sql,
        params![
            source.id,
            source.tag,
            source.url,
            source.author,
            source.title,
            source.date_accessed,
            source.date_published,
        ],
    )
    .map_err(|e| {
        constraint_or_storage(e, || format!("source {} in project {}", source.id, project_id))
    })?;
    Ok(())
}

pub fn get_source(conn: &Connection, project_id: &ProjectId, source_id: &str) -> Result<Source> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        Source::COLUMNS,
        table_ident(project_id)
    );
    conn.query_row(&sql, [source_id], Source::from_row)
        .optional()?
        .ok_or_else(|| source_not_found(project_id, source_id))
}

pub fn list_sources(conn: &Connection, project_id: &ProjectId) -> Result<Vec<Source>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY rowid",
        Source::COLUMNS,
        table_ident(project_id)
    );
    let mut stmt = conn.prepare(&sql)?;
    let sources = stmt
        .query_map([], Source::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(sources)
}

/// Replace every field except the id
pub fn update_source(conn: &Connection, project_id: &ProjectId, source: &Source) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET tag = ?1, url = ?2, author = ?3, title = ?4, date_accessed = ?5, date_published = ?6 WHERE id = ?7",
        table_ident(project_id)
    );
    let rows = conn.execute(
        &sql,
        params![
            source.tag,
            source.url,
            source.author,
            source.title,
            source.date_accessed,
            source.date_published,
            source.id,
        ],
    )?;
    if rows == 0 {
        return Err(source_not_found(project_id, &source.id));
    }
    Ok(())
}

pub fn delete_source(conn: &Connection, project_id: &ProjectId, source_id: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table_ident(project_id));
    let rows = conn.execute(&sql, [source_id])?;
    if rows == 0 {
        return Err(source_not_found(project_id, source_id));
    }
    Ok(())
}
