//! On-disk persistence: contexts survive process restarts.

use dossier::context::query::{get_context, list_contexts};
use dossier::context::stats::context_stats;
use dossier::context::store::put_context;
use dossier::context::types::Priority;
use dossier::db;

#[test]
fn contexts_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("contexts.db");

    {
        let mut conn = db::open_database(&db_path).unwrap();
        let tags = vec!["architecture".to_string()];
        put_context(
            &mut conn,
            "myapp",
            "auth-pattern",
            "Use JWT with refresh tokens",
            &tags,
            Priority::High,
            None,
        )
        .unwrap();
    }

    // Fresh connection, same file
    let conn = db::open_database(&db_path).unwrap();
    let ctx = get_context(&conn, "myapp", "auth-pattern").unwrap();
    assert_eq!(ctx.content, "Use JWT with refresh tokens");
    assert_eq!(ctx.priority, Priority::High);

    // The tag index came back with it
    let listed = list_contexts(&conn, "myapp", Some("architecture")).unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn stats_report_the_db_file_size() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("contexts.db");

    let mut conn = db::open_database(&db_path).unwrap();
    put_context(&mut conn, "myapp", "k", "some text", &[], Priority::Medium, None).unwrap();

    let stats = context_stats(&conn, Some("myapp"), Some(&db_path)).unwrap();
    assert_eq!(stats.total_contexts, 1);
    assert!(stats.db_size_bytes > 0);
}
