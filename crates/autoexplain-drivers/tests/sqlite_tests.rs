#![cfg(feature = "sqlite")]

//! Integration tests for the SQLite driver
use autoexplain_drivers::sqlite::SqliteConnection;
use autoexplain_drivers::{Connection, Value};
use pretty_assertions::assert_eq;

async fn setup_users() -> SqliteConnection {
    let conn = SqliteConnection::open(":memory:").expect("Failed to open in-memory db");
    conn.execute(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT NOT NULL UNIQUE, score REAL)",
        &[],
    )
    .await
    .expect("Failed to create table");
    conn
}

#[tokio::test]
async fn test_bound_parameters_round_trip() {
    let conn = setup_users().await;

    let inserted = conn
        .execute(
            "INSERT INTO users (username, score) VALUES (?, ?)",
            &[Value::from("o'brien"), Value::Float64(1.5)],
        )
        .await
        .unwrap();
    assert_eq!(inserted.affected_rows, 1);
    assert_eq!(inserted.last_insert_id, Some(1));

    let result = conn
        .query(
            "SELECT username, score FROM users WHERE username = ?",
            &[Value::from("o'brien")],
        )
        .await
        .unwrap();
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.columns[0].name, "username");
    assert_eq!(result.columns[0].data_type, "TEXT");
    assert_eq!(result.rows[0].get(0), Some(&Value::from("o'brien")));
    assert_eq!(result.rows[0].get_by_name("score"), Some(&Value::Float64(1.5)));
}

#[tokio::test]
async fn test_query_error_is_reported() {
    let conn = setup_users().await;
    let err = conn.query("SELECT * FROM missing", &[]).await.unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");
    let conn = SqliteConnection::open(path.to_str().unwrap()).unwrap();
    conn.execute("CREATE TABLE t (v TEXT)", &[]).await.unwrap();
    assert!(path.exists());

    assert!(!conn.is_closed());
    conn.close().await.unwrap();
    assert!(conn.is_closed());
}

#[test]
fn test_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("app.db");
    assert!(SqliteConnection::open(path.to_str().unwrap()).is_err());
}
