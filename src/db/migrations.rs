//! Forward-only schema migrations.
//!
//! The schema version lives in `schema_meta`. Each entry in [`MIGRATIONS`]
//! upgrades the database by one version; [`run_migrations`] applies whichever
//! are still pending, in order. `schema_meta` also records which embedding
//! model wrote the stored vectors, so a model switch is detectable at startup.

use rusqlite::Connection;

/// The schema version this binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// (target version, upgrade) pairs in ascending order. Entry `(n, f)` brings a
/// database at version `n - 1` up to version `n`.
const MIGRATIONS: &[(u32, fn(&Connection) -> rusqlite::Result<()>)] =
    &[(2, record_default_embedding_model)];

/// Read the schema version recorded in `schema_meta`.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: String = conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| row.get(0),
    )?;
    Ok(raw.parse().unwrap_or(0))
}

/// Apply all pending migrations.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let mut version = schema_version(conn)?;
    tracing::debug!(schema_version = version, expected = CURRENT_SCHEMA_VERSION, "checking migrations");

    for (target, upgrade) in MIGRATIONS {
        if version >= *target {
            continue;
        }
        tracing::info!(from = version, to = *target, "applying migration");
        upgrade(conn)?;
        conn.execute(
            "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
            [target.to_string()],
        )?;
        version = *target;
    }

    Ok(())
}

/// The embedding model the stored vectors were written with, if recorded.
pub fn stored_embedding_model(conn: &Connection) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'embedding_model'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

/// Record the embedding model now in use.
pub fn set_embedding_model(conn: &Connection, model: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO schema_meta (key, value) VALUES ('embedding_model', ?1) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [model],
    )?;
    Ok(())
}

/// v1 → v2: databases written before the model identifier existed get the
/// default model name, since that is what embedded their vectors.
fn record_default_embedding_model(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('embedding_model', 'all-minilm')",
        [],
    )?;
    Ok(())
}
