//! SQLite connection implementation

use async_trait::async_trait;
use autoexplain_core::{
    ColumnMeta, Connection, DbError, QueryResult, Result, Row, StatementResult, Value,
};
use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{OpenFlags, ToSql, params_from_iter};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// A single rusqlite handle shared by every statement issued through it.
///
/// rusqlite calls are synchronous; they run on the calling task while the
/// handle is locked.
pub struct SqliteConnection {
    conn: Mutex<rusqlite::Connection>,
    closed: AtomicBool,
}

impl SqliteConnection {
    /// Open a database file, creating it if needed. `:memory:` opens a
    /// private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");

        let conn = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            if !path.starts_with("file:")
                && let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                return Err(DbError::Connection(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
            rusqlite::Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        }
        .map_err(|e| DbError::Connection(format!("Failed to open SQLite database '{}': {}", path, e)))?;

        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| DbError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
            closed: AtomicBool::new(false),
        })
    }

    fn with_conn<T>(
        &self,
        context: &str,
        f: impl FnOnce(&rusqlite::Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        if self.is_closed() {
            return Err(DbError::Connection("SQLite connection is closed".to_string()));
        }
        let conn = self.conn.lock();
        f(&conn).map_err(|e| DbError::Query(format!("{}: {}", context, e)))
    }
}

/// Borrowed view of a [`Value`] as a SQLite parameter
struct Param<'a>(&'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let owned = match self.0 {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Int32(i) => SqlValue::Integer(i64::from(*i)),
            Value::Int64(i) => SqlValue::Integer(*i),
            Value::Float64(f) => SqlValue::Real(*f),
            Value::String(s) | Value::Decimal(s) => return Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            Value::Bytes(b) => return Ok(ToSqlOutput::Borrowed(ValueRef::Blob(b))),
            other => SqlValue::Text(other.to_text().unwrap_or_default()),
        };
        Ok(ToSqlOutput::Owned(owned))
    }
}

fn decode(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn dialect_id(&self) -> Option<&'static str> {
        Some("sqlite")
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        let result = self.with_conn("Failed to execute statement", |conn| {
            let affected = conn.execute(sql, params_from_iter(params.iter().map(Param)))?;
            Ok(StatementResult {
                affected_rows: affected as u64,
                last_insert_id: u64::try_from(conn.last_insert_rowid()).ok(),
            })
        })?;
        tracing::debug!(affected_rows = result.affected_rows, "statement executed");
        Ok(result)
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let result = self.with_conn("Failed to run query", |conn| {
            let mut stmt = conn.prepare(sql)?;
            let mut result = QueryResult::empty();
            result.columns = stmt
                .columns()
                .iter()
                .enumerate()
                .map(|(ordinal, col)| {
                    ColumnMeta::new(col.name(), col.decl_type().unwrap_or("DYNAMIC"), ordinal)
                })
                .collect();
            let names = result.column_names();
            let width = names.len();

            let mut rows = stmt.query(params_from_iter(params.iter().map(Param)))?;
            while let Some(row) = rows.next()? {
                let values = (0..width)
                    .map(|i| row.get_ref(i).map(decode))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                result.rows.push(Row::new(names.clone(), values));
            }
            Ok(result)
        })?;
        tracing::debug!(row_count = result.row_count(), "query executed");
        Ok(result)
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing SQLite connection");
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
