//! The plugin installed on a real in-memory SQLite database
//!
//! SQLite's `EXPLAIN QUERY PLAN` answers with a table rather than JSON, so
//! analysis fails to parse on every statement. These tests check that the
//! caller's own results are never affected by that.

mod common;

use autoexplain::{AutoExplain, AutoExplainConfig};
use autoexplain_core::{Session, Value};
use autoexplain_driver_sqlite::SqliteConnection;
use common::{Collected, init_tracing};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn sqlite_session(collected: &Collected) -> Session {
    init_tracing();
    let config = AutoExplainConfig::default().with_explain_clause("EXPLAIN QUERY PLAN ");
    let plugin = AutoExplain::from_config(config)
        .unwrap()
        .on_explain(collected.observer());
    let session = Session::new(Arc::new(SqliteConnection::open(":memory:").unwrap()));
    session.use_plugin(&plugin).unwrap();
    session
}

#[tokio::test]
async fn test_results_unaffected_by_unparseable_plans() {
    let collected = Collected::default();
    let session = sqlite_session(&collected);

    session
        .exec("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)", &[])
        .await
        .unwrap();
    for name in ["alice", "bob", "carol"] {
        let result = session
            .exec("INSERT INTO users (name) VALUES (?)", &[Value::from(name)])
            .await
            .unwrap();
        assert_eq!(result.affected_rows, 1);
    }

    let result = session
        .query("SELECT name FROM users WHERE id > ? ORDER BY id", &[Value::Int64(1)])
        .await
        .unwrap();
    let names: Vec<String> = result
        .rows
        .iter()
        .filter_map(|row| row.get(0).and_then(|v| v.as_str()).map(String::from))
        .collect();
    assert_eq!(names, vec!["bob", "carol"]);

    let count = session
        .raw_scalar("SELECT COUNT(*) FROM users", &[])
        .await
        .unwrap();
    assert_eq!(count.as_deref(), Some("3"));

    assert_eq!(collected.len(), 0);
}

#[tokio::test]
async fn test_failed_statement_still_reported_to_caller() {
    let collected = Collected::default();
    let session = sqlite_session(&collected);

    let err = session.query("SELECT * FROM missing_table", &[]).await;

    assert!(err.is_err());
    assert_eq!(collected.len(), 0);
}
