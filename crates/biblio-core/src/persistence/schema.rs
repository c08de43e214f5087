//! SQLite schema for the project registry and per-project source tables
//!
//! Each project owns one table named exactly after its id. Table names are
//! only ever built from a [`ProjectId`], never from a raw string.

use rusqlite::Connection;

use crate::error::Result;
use crate::ids::ProjectId;

const REGISTRY_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS Projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    password TEXT NOT NULL
);
"#;

/// Quoted identifier for a project's source table
pub(crate) fn table_ident(project_id: &ProjectId) -> String {
    // Canonical UUID text is [0-9a-f-] only, so plain quoting is enough.
    format!("\"{}\"", project_id)
}

/// Create the `Projects` registry if missing
pub fn ensure_registry(conn: &Connection) -> Result<()> {
    conn.execute_batch(REGISTRY_SQL)?;
    Ok(())
}

/// Create the source table for a project if missing
pub fn create_project_table(conn: &Connection, project_id: &ProjectId) -> Result<()> {
    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {} (
    id TEXT PRIMARY KEY,
    tag TEXT NOT NULL,
    url TEXT NOT NULL,
    author TEXT NOT NULL,
    title TEXT NOT NULL,
    date_accessed TEXT NOT NULL,
    date_published TEXT NOT NULL
);
"#,
        table_ident(project_id)
    );
    conn.execute_batch(&sql)?;
    Ok(())
}

/// Drop a project's source table; a missing table is not an error
pub fn drop_project_table(conn: &Connection, project_id: &ProjectId) -> Result<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", table_ident(project_id)))?;
    Ok(())
}

/// Whether the source table for a project exists
pub fn project_table_exists(conn: &Connection, project_id: &ProjectId) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [project_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All tables whose names are canonical project ids
pub fn project_tables(conn: &Connection) -> Result<Vec<ProjectId>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(names
        .iter()
        .filter_map(|name| ProjectId::parse(name).ok())
        .collect())
}
