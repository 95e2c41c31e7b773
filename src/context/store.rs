//! Write path — validation, summarization, upsert, tag index sync, embedding sync.
//!
//! [`put_context`] is the single entry point. Writes are create-or-replace on
//! (project, key): a replace keeps the row id and `created_at`, advances
//! `updated_at`, diffs the tag set against the index, and replaces or clears
//! the embedding row. The whole pipeline runs inside one transaction.

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::Serialize;

use crate::context::summary::summarize;
use crate::context::tags::{normalize_tags, sync_memberships};
use crate::context::types::{require_non_empty, Context, ContextError, Priority};

/// Result returned from a put operation.
#[derive(Debug, Serialize)]
pub struct StoreContextResult {
    /// The context as persisted.
    #[serde(flatten)]
    pub context: Context,
    /// `true` when the key did not exist before this write.
    pub created: bool,
}

/// Full write path: validate → summarize → upsert → tag diff → embedding sync.
///
/// The embedding, when present, must already be computed from `content`;
/// callers on the degraded path pass `None` and any stale vector for the key
/// is cleared so readers never observe an embedding out of step with content.
pub fn put_context(
    conn: &mut Connection,
    project: &str,
    key: &str,
    content: &str,
    tags: &[String],
    priority: Priority,
    embedding: Option<&[f32]>,
) -> Result<StoreContextResult, ContextError> {
    // 1. Validate before anything touches storage
    require_non_empty("project", project)?;
    require_non_empty("key", key)?;
    require_non_empty("content", content)?;
    let tags = normalize_tags(tags)?;

    // 2. Derive the summary
    let summary = summarize(content);

    let now = chrono::Utc::now().to_rfc3339();
    let tags_json = serde_json::json!(tags).to_string();

    let tx = conn.transaction()?;

    // 3. Create or replace the row
    let existing: Option<(String, String, String)> = tx
        .query_row(
            "SELECT id, created_at, tags FROM contexts WHERE project = ?1 AND key = ?2",
            params![project, key],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    let (id, created_at, created, old_tags) = match existing {
        Some((id, created_at, old_tags_json)) => {
            tx.execute(
                "UPDATE contexts SET content = ?1, summary = ?2, tags = ?3, priority = ?4, updated_at = ?5 \
                 WHERE id = ?6",
                params![content, summary, tags_json, priority.as_str(), now, id],
            )?;
            let old_tags: Vec<String> =
                serde_json::from_str(&old_tags_json).unwrap_or_default();
            (id, created_at, false, old_tags)
        }
        None => {
            let id = uuid::Uuid::now_v7().to_string();
            tx.execute(
                "INSERT INTO contexts (id, project, key, content, summary, tags, priority, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![id, project, key, content, summary, tags_json, priority.as_str(), now],
            )?;
            (id, now.clone(), true, Vec::new())
        }
    };

    // 4. Sync the tag index
    sync_memberships(&tx, &id, project, &old_tags, &tags)?;

    // 5. Sync the embedding row
    sync_embedding(&tx, &id, embedding)?;

    tx.commit()?;

    Ok(StoreContextResult {
        context: Context {
            id,
            project: project.to_string(),
            key: key.to_string(),
            content: content.to_string(),
            summary,
            tags,
            priority,
            created_at,
            updated_at: now,
        },
        created,
    })
}

/// Replace or clear the stored vector for a context.
fn sync_embedding(
    tx: &Transaction,
    id: &str,
    embedding: Option<&[f32]>,
) -> rusqlite::Result<()> {
    tx.execute("DELETE FROM contexts_vec WHERE id = ?1", params![id])?;
    if let Some(embedding) = embedding {
        let bytes = crate::context::embedding_to_bytes(embedding);
        tx.execute(
            "INSERT INTO contexts_vec (id, embedding) VALUES (?1, ?2)",
            params![id, bytes],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::summary::SUMMARY_THRESHOLD;

    fn test_db() -> Connection {
        crate::db::load_sqlite_vec();
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        crate::db::schema::init_schema(&conn).unwrap();
        conn
    }

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    /// Unit vector along dimension 0.
    fn embedding_a() -> Vec<f32> {
        let mut v = vec![0.0f32; 384];
        v[0] = 1.0;
        v
    }

    #[test]
    fn put_creates_new_context() {
        let mut conn = test_db();

        let result = put_context(
            &mut conn,
            "myapp",
            "auth-pattern",
            "Use JWT with refresh tokens",
            &tags(&["architecture", "auth"]),
            Priority::Medium,
            None,
        )
        .unwrap();

        assert!(result.created);
        assert_eq!(result.context.key, "auth-pattern");
        assert_eq!(result.context.tags, vec!["architecture", "auth"]);
        assert!(result.context.summary.is_none());
        assert_eq!(result.context.created_at, result.context.updated_at);

        let content: String = conn
            .query_row(
                "SELECT content FROM contexts WHERE project = 'myapp' AND key = 'auth-pattern'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(content, "Use JWT with refresh tokens");
    }

    #[test]
    fn replace_keeps_identity_and_created_at() {
        let mut conn = test_db();

        let first = put_context(
            &mut conn, "myapp", "k", "first", &[], Priority::Medium, None,
        )
        .unwrap();
        assert!(first.created);

        std::thread::sleep(std::time::Duration::from_millis(5));

        let second = put_context(
            &mut conn, "myapp", "k", "second", &[], Priority::High, None,
        )
        .unwrap();

        assert!(!second.created);
        assert_eq!(second.context.id, first.context.id);
        assert_eq!(second.context.created_at, first.context.created_at);
        assert!(second.context.updated_at > first.context.updated_at);

        // Still exactly one row for the key
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM contexts WHERE project = 'myapp' AND key = 'k'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn same_key_in_different_projects_is_independent() {
        let mut conn = test_db();
        put_context(&mut conn, "app-a", "k", "for a", &[], Priority::Medium, None).unwrap();
        put_context(&mut conn, "app-b", "k", "for b", &[], Priority::Medium, None).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contexts WHERE key = 'k'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn empty_identifiers_are_rejected_before_write() {
        let mut conn = test_db();
        assert!(put_context(&mut conn, "", "k", "text", &[], Priority::Medium, None).is_err());
        assert!(put_context(&mut conn, "p", " ", "text", &[], Priority::Medium, None).is_err());
        assert!(put_context(&mut conn, "p", "k", "", &[], Priority::Medium, None).is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contexts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "no partial mutation on invalid input");
    }

    #[test]
    fn malformed_tags_reject_the_whole_write() {
        let mut conn = test_db();
        let result = put_context(
            &mut conn,
            "p",
            "k",
            "text",
            &tags(&["valid", "  "]),
            Priority::Medium,
            None,
        );
        assert!(matches!(result, Err(ContextError::InvalidInput(_))));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contexts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn long_content_stores_a_summary() {
        let mut conn = test_db();
        let content = "c".repeat(SUMMARY_THRESHOLD + 200);

        let result =
            put_context(&mut conn, "p", "long", &content, &[], Priority::Medium, None).unwrap();
        let summary = result.context.summary.unwrap();
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_THRESHOLD + 3);

        // Replace with short content drops the summary
        let result =
            put_context(&mut conn, "p", "long", "now short", &[], Priority::Medium, None).unwrap();
        assert!(result.context.summary.is_none());

        let stored: Option<String> = conn
            .query_row(
                "SELECT summary FROM contexts WHERE project = 'p' AND key = 'long'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn embedding_row_is_stored_and_cleared() {
        let mut conn = test_db();
        let emb = embedding_a();

        let result = put_context(
            &mut conn, "p", "k", "with vector", &[], Priority::Medium, Some(&emb),
        )
        .unwrap();

        let vec_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM contexts_vec WHERE id = ?1",
                params![result.context.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(vec_count, 1);

        // A replace on the degraded path clears the now-stale vector
        put_context(
            &mut conn, "p", "k", "edited without vector", &[], Priority::Medium, None,
        )
        .unwrap();

        let vec_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM contexts_vec WHERE id = ?1",
                params![result.context.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(vec_count, 0);
    }

    #[test]
    fn replace_updates_tag_memberships() {
        let mut conn = test_db();
        put_context(
            &mut conn, "p", "k", "v1", &tags(&["old", "kept"]), Priority::Medium, None,
        )
        .unwrap();
        put_context(
            &mut conn, "p", "k", "v2", &tags(&["kept", "new"]), Priority::Medium, None,
        )
        .unwrap();

        let stored: Vec<String> = conn
            .prepare("SELECT tag FROM context_tags WHERE project = 'p' ORDER BY tag")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(stored, vec!["kept", "new"]);
    }
}
