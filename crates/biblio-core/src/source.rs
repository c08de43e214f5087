//! Source domain model
//!
//! One bibliographic citation. Dates are kept as the caller wrote them.

use serde::{Deserialize, Serialize};

/// A citation stored in its project's table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Unique within the owning project only
    pub id: String,
    pub tag: String,
    pub url: String,
    pub author: String,
    pub title: String,
    pub date_accessed: String,
    pub date_published: String,
}

impl Source {
    /// Column list shared by every per-project query, in table order
    pub(crate) const COLUMNS: &'static str =
        "id, tag, url, author, title, date_accessed, date_published";

    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tag: row.get(1)?,
            url: row.get(2)?,
            author: row.get(3)?,
            title: row.get(4)?,
            date_accessed: row.get(5)?,
            date_published: row.get(6)?,
        })
    }
}
