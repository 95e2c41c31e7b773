//! Database bootstrap: a fresh open yields the full schema, WAL mode, and a
//! working vec0 table; reopening is idempotent.

use dossier::db;
use rusqlite::params;

#[test]
fn fresh_open_creates_the_full_schema() {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_database(dir.path().join("contexts.db")).unwrap();

    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    for expected in ["contexts", "context_tags", "contexts_vec", "schema_meta"] {
        assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
    }

    let indexes: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    for expected in ["idx_contexts_project", "idx_contexts_updated", "idx_tags_lookup"] {
        assert!(indexes.iter().any(|i| i == expected), "missing index {expected}");
    }

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    assert_eq!(
        db::migrations::schema_version(&conn).unwrap(),
        db::migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn reopening_the_same_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contexts.db");

    drop(db::open_database(&path).unwrap());
    let conn = db::open_database(&path).unwrap();

    assert_eq!(
        db::migrations::schema_version(&conn).unwrap(),
        db::migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn vec0_answers_a_nearest_neighbor_query() {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_database(dir.path().join("contexts.db")).unwrap();

    // Two distinguishable unit vectors
    let mut a = vec![0.0f32; 384];
    a[0] = 1.0;
    let mut b = vec![0.0f32; 384];
    b[7] = 1.0;

    for (id, v) in [("vec-a", &a), ("vec-b", &b)] {
        let bytes: Vec<u8> = v.iter().flat_map(|x| x.to_le_bytes()).collect();
        conn.execute(
            "INSERT INTO contexts_vec (id, embedding) VALUES (?1, ?2)",
            params![id, bytes],
        )
        .unwrap();
    }

    let query: Vec<u8> = a.iter().flat_map(|x| x.to_le_bytes()).collect();
    let nearest: String = conn
        .query_row(
            "SELECT id FROM contexts_vec WHERE embedding MATCH ?1 ORDER BY distance LIMIT 1",
            params![query],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(nearest, "vec-a");
}

#[test]
fn tag_rows_cascade_when_the_context_row_goes() {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_database(dir.path().join("contexts.db")).unwrap();

    conn.execute(
        "INSERT INTO contexts (id, project, key, content, created_at, updated_at)
         VALUES ('c1', 'p', 'k', 'text', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO context_tags (context_id, project, tag) VALUES ('c1', 'p', 'todo')",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM contexts WHERE id = 'c1'", []).unwrap();

    let orphans: i64 = conn
        .query_row("SELECT COUNT(*) FROM context_tags", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);
}
