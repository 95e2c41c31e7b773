//! Read path — exact lookup and tag-filtered listing.

use rusqlite::{params, Connection, Row};

use crate::context::types::{Context, ContextError};

pub(crate) const CONTEXT_COLUMNS: &str =
    "id, project, key, content, summary, tags, priority, created_at, updated_at";

/// Map a row selected with [`CONTEXT_COLUMNS`] into a [`Context`].
pub(crate) fn row_to_context(row: &Row) -> rusqlite::Result<Context> {
    let tags_json: String = row.get(5)?;
    let priority: String = row.get(6)?;
    Ok(Context {
        id: row.get(0)?,
        project: row.get(1)?,
        key: row.get(2)?,
        content: row.get(3)?,
        summary: row.get(4)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        // The CHECK constraint keeps the column well-formed
        priority: priority.parse().unwrap_or_default(),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Exact lookup by (project, key).
pub fn get_context(conn: &Connection, project: &str, key: &str) -> Result<Context, ContextError> {
    conn.query_row(
        &format!("SELECT {CONTEXT_COLUMNS} FROM contexts WHERE project = ?1 AND key = ?2"),
        params![project, key],
        row_to_context,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => ContextError::NotFound {
            project: project.to_string(),
            key: key.to_string(),
        },
        other => ContextError::Storage(other),
    })
}

/// All contexts in a project, most recently touched first.
///
/// `tag_filter` narrows through the tag index to contexts whose tag set
/// contains the exact tag. Stored tags are normalized at write time, so the
/// filter is matched case-sensitively as given; no substring matching.
pub fn list_contexts(
    conn: &Connection,
    project: &str,
    tag_filter: Option<&str>,
) -> Result<Vec<Context>, ContextError> {
    let mut out = Vec::new();
    match tag_filter {
        Some(tag) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTEXT_COLUMNS} FROM contexts \
                 WHERE project = ?1 \
                 AND id IN (SELECT context_id FROM context_tags WHERE project = ?1 AND tag = ?2) \
                 ORDER BY updated_at DESC, key ASC"
            ))?;
            let rows = stmt.query_map(params![project, tag], row_to_context)?;
            for row in rows {
                out.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTEXT_COLUMNS} FROM contexts WHERE project = ?1 \
                 ORDER BY updated_at DESC, key ASC"
            ))?;
            let rows = stmt.query_map(params![project], row_to_context)?;
            for row in rows {
                out.push(row?);
            }
        }
    }
    Ok(out)
}
