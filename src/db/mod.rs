pub mod migrations;
pub mod schema;

use std::path::Path;
use std::sync::Once;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sqlite_vec::sqlite3_vec_init;

static VEC_EXTENSION: Once = Once::new();

/// Register sqlite-vec as an auto-loaded extension for every connection opened
/// after this call. Idempotent.
pub fn load_sqlite_vec() {
    VEC_EXTENSION.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open the context database at `path`, creating the file and its parent
/// directory on first use.
///
/// The returned connection has WAL and foreign keys enabled and its schema
/// brought up to the version this binary expects.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    load_sqlite_vec();

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL keeps readers unblocked while a write transaction commits
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // context_tags rows cascade when their context row goes away
    conn.pragma_update(None, "foreign_keys", "ON")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}
