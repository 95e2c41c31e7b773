//! Tag normalization and the inverted tag index.
//!
//! Tags are stored canonically as a JSON array on the context row. The
//! `context_tags` table is a derived index from (project, tag) to context ids,
//! updated incrementally on every write and rebuildable from the canonical rows
//! at any time.

use std::collections::HashSet;

use rusqlite::{params, Connection, Transaction};

use crate::context::types::ContextError;

/// Normalize a raw tag list: trim, lowercase, collapse duplicates, sort.
///
/// A tag that is empty after trimming is malformed input and is rejected,
/// never silently dropped.
pub fn normalize_tags(raw: &[String]) -> Result<Vec<String>, ContextError> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in raw {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ContextError::InvalidInput(format!(
                "tag {tag:?} is empty after trimming"
            )));
        }
        if seen.insert(normalized.clone()) {
            tags.push(normalized);
        }
    }
    tags.sort();
    Ok(tags)
}

/// Apply a tag-set change for one context: remove stale memberships, add new ones.
///
/// Diffs the old set against the new one so unchanged memberships are untouched.
pub(crate) fn sync_memberships(
    tx: &Transaction,
    context_id: &str,
    project: &str,
    old: &[String],
    new: &[String],
) -> rusqlite::Result<()> {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    for tag in old_set.difference(&new_set) {
        tx.execute(
            "DELETE FROM context_tags WHERE context_id = ?1 AND tag = ?2",
            params![context_id, tag],
        )?;
    }
    for tag in new_set.difference(&old_set) {
        tx.execute(
            "INSERT INTO context_tags (context_id, project, tag) VALUES (?1, ?2, ?3)",
            params![context_id, project, tag],
        )?;
    }
    Ok(())
}

/// Rebuild the entire index by replaying the canonical tag arrays.
///
/// The index is a pure cache: dropping it and replaying `contexts.tags` must
/// reproduce identical filtering results. Returns the number of memberships
/// written.
pub fn rebuild_tag_index(conn: &mut Connection) -> Result<usize, ContextError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM context_tags", [])?;

    let rows: Vec<(String, String, String)> = {
        let mut stmt = tx.prepare("SELECT id, project, tags FROM contexts")?;
        let mapped = stmt.query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;
        mapped.collect::<Result<Vec<_>, _>>()?
    };

    let mut memberships = 0usize;
    for (id, project, tags_json) in rows {
        let tags: Vec<String> = match serde_json::from_str(&tags_json) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(context_id = %id, error = %e, "skipping unparseable tag array");
                continue;
            }
        };
        for tag in &tags {
            tx.execute(
                "INSERT OR IGNORE INTO context_tags (context_id, project, tag) VALUES (?1, ?2, ?3)",
                params![id, project, tag],
            )?;
            memberships += 1;
        }
    }

    tx.commit()?;
    Ok(memberships)
}
