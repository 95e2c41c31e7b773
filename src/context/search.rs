//! Vector similarity search over stored contexts.
//!
//! KNN over the vec0 table, narrowed to one project, ranked by cosine
//! similarity. Stored and query vectors are L2-normalized, so similarity is
//! recovered directly from the L2 distance sqlite-vec reports.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::context::query::{row_to_context, CONTEXT_COLUMNS};
use crate::context::types::{Context, ContextError};
use crate::context::{embedding_to_bytes, l2_distance_to_similarity};

/// A similarity hit: the context plus its score.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub context: Context,
    pub similarity: f64,
}

/// Top-K contexts in `project` nearest to `query_embedding`.
///
/// A project with no embedded records produces an empty result. Ties in
/// similarity break toward the most recently updated context.
pub fn search_contexts(
    conn: &Connection,
    project: &str,
    query_embedding: &[f32],
    k: usize,
) -> Result<Vec<SearchHit>, ContextError> {
    if k == 0 {
        return Ok(Vec::new());
    }

    // The KNN scans across all projects, so over-fetch before the project filter.
    let candidate_limit = (k * 4).max(16);

    let bytes = embedding_to_bytes(query_embedding);
    let mut stmt = conn.prepare(
        "SELECT id, distance FROM contexts_vec \
         WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
    )?;
    let candidates: Vec<(String, f64)> = stmt
        .query_map(params![bytes, candidate_limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut hits: Vec<SearchHit> = Vec::new();
    for (id, distance) in candidates {
        let Some(context) = fetch_by_id(conn, &id)? else {
            continue;
        };
        if context.project != project {
            continue;
        }
        hits.push(SearchHit {
            context,
            similarity: l2_distance_to_similarity(distance),
        });
    }

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.context.updated_at.cmp(&a.context.updated_at))
    });
    hits.truncate(k);
    Ok(hits)
}

fn fetch_by_id(conn: &Connection, id: &str) -> Result<Option<Context>, ContextError> {
    let row = conn
        .query_row(
            &format!("SELECT {CONTEXT_COLUMNS} FROM contexts WHERE id = ?1"),
            params![id],
            row_to_context,
        )
        .optional()?;
    Ok(row)
}
