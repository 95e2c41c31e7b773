//! SQL DDL for all dossier tables.
//!
//! Defines the `contexts`, `context_tags` (inverted tag index), `contexts_vec`
//! (vec0), and `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

/// All schema DDL statements for dossier's core tables.
const SCHEMA_SQL: &str = r#"
-- Context records, one row per (project, key)
CREATE TABLE IF NOT EXISTS contexts (
    id TEXT PRIMARY KEY,
    project TEXT NOT NULL,
    key TEXT NOT NULL,
    content TEXT NOT NULL,
    summary TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    priority TEXT NOT NULL DEFAULT 'medium' CHECK(priority IN ('low','medium','high')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(project, key)
);

CREATE INDEX IF NOT EXISTS idx_contexts_project ON contexts(project);
CREATE INDEX IF NOT EXISTS idx_contexts_updated ON contexts(project, updated_at);

-- Inverted tag index, derived from contexts.tags
CREATE TABLE IF NOT EXISTS context_tags (
    context_id TEXT NOT NULL REFERENCES contexts(id) ON DELETE CASCADE,
    project TEXT NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (context_id, tag)
);

CREATE INDEX IF NOT EXISTS idx_tags_lookup ON context_tags(project, tag);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 virtual table must be created separately (sqlite-vec syntax).
const VEC_TABLE_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS contexts_vec USING vec0(
    id TEXT PRIMARY KEY,
    embedding FLOAT[384]
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(VEC_TABLE_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
