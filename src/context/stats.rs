//! Store statistics.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Response from context_stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_contexts: u64,
    pub by_priority: HashMap<String, u64>,
    pub by_tag: HashMap<String, u64>,
    /// Contexts that currently carry an embedding vector.
    pub embedded_contexts: u64,
    pub db_size_bytes: u64,
}

/// Compute store statistics.
///
/// If `project` is provided, counts are filtered to that project.
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn context_stats(
    conn: &Connection,
    project: Option<&str>,
    db_path: Option<&Path>,
) -> Result<StatsResponse> {
    let total = count_contexts(conn, project)?;
    let by_priority = count_by_priority(conn, project)?;
    let by_tag = count_by_tag(conn, project)?;
    let embedded = count_embedded(conn, project)?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        total_contexts: total,
        by_priority,
        by_tag,
        embedded_contexts: embedded,
        db_size_bytes,
    })
}

fn count_contexts(conn: &Connection, project: Option<&str>) -> Result<u64> {
    let count: i64 = match project {
        Some(p) => conn.query_row(
            "SELECT COUNT(*) FROM contexts WHERE project = ?1",
            params![p],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM contexts", [], |row| row.get(0))?,
    };
    Ok(count as u64)
}

fn count_by_priority(conn: &Connection, project: Option<&str>) -> Result<HashMap<String, u64>> {
    let mut map = HashMap::new();
    match project {
        Some(p) => {
            let mut stmt = conn.prepare(
                "SELECT priority, COUNT(*) FROM contexts WHERE project = ?1 GROUP BY priority",
            )?;
            let rows = stmt.query_map(params![p], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (priority, count) = row?;
                map.insert(priority, count as u64);
            }
        }
        None => {
            let mut stmt =
                conn.prepare("SELECT priority, COUNT(*) FROM contexts GROUP BY priority")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (priority, count) = row?;
                map.insert(priority, count as u64);
            }
        }
    }
    Ok(map)
}

fn count_by_tag(conn: &Connection, project: Option<&str>) -> Result<HashMap<String, u64>> {
    let mut map = HashMap::new();
    match project {
        Some(p) => {
            let mut stmt = conn.prepare(
                "SELECT tag, COUNT(*) FROM context_tags WHERE project = ?1 GROUP BY tag",
            )?;
            let rows = stmt.query_map(params![p], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (tag, count) = row?;
                map.insert(tag, count as u64);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT tag, COUNT(*) FROM context_tags GROUP BY tag")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (tag, count) = row?;
                map.insert(tag, count as u64);
            }
        }
    }
    Ok(map)
}

fn count_embedded(conn: &Connection, project: Option<&str>) -> Result<u64> {
    let count: i64 = match project {
        Some(p) => conn.query_row(
            "SELECT COUNT(*) FROM contexts c \
             WHERE c.project = ?1 AND c.id IN (SELECT id FROM contexts_vec)",
            params![p],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM contexts c WHERE c.id IN (SELECT id FROM contexts_vec)",
            [],
            |row| row.get(0),
        )?,
    };
    Ok(count as u64)
}
