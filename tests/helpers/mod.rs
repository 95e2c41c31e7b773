#![allow(dead_code)]

use dossier::context::store::{put_context, StoreContextResult};
use dossier::context::types::Priority;
use dossier::db;
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::load_sqlite_vec();
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Deterministic 384-dim unit vector with a spike at `seed`. Distinct seeds
/// give mutually orthogonal vectors.
pub fn test_embedding(seed: u8) -> Vec<f32> {
    let mut v = vec![0.0f32; 384];
    v[usize::from(seed) % 384] = 1.0;
    v
}

/// Store a context with medium priority and no embedding.
pub fn put_simple(
    conn: &mut Connection,
    project: &str,
    key: &str,
    content: &str,
    tags: &[&str],
) -> StoreContextResult {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    put_context(conn, project, key, content, &tags, Priority::Medium, None).unwrap()
}
