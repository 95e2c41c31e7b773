//! Context deletion.
//!
//! Removes the record, its tag index memberships (FK cascade), and its
//! embedding row in one transaction.

use rusqlite::{params, Connection, OptionalExtension};

use crate::context::types::ContextError;

/// Remove a context and all derived state.
///
/// Returns `false` when no record matched the (project, key).
pub fn delete_context(
    conn: &mut Connection,
    project: &str,
    key: &str,
) -> Result<bool, ContextError> {
    let tx = conn.transaction()?;

    let id: Option<String> = tx
        .query_row(
            "SELECT id FROM contexts WHERE project = ?1 AND key = ?2",
            params![project, key],
            |row| row.get(0),
        )
        .optional()?;

    let Some(id) = id else {
        return Ok(false);
    };

    // vec0 tables take no foreign keys, so the vector row goes explicitly
    tx.execute("DELETE FROM contexts_vec WHERE id = ?1", params![id])?;
    // context_tags rows cascade via FK
    tx.execute("DELETE FROM contexts WHERE id = ?1", params![id])?;

    tx.commit()?;
    Ok(true)
}
