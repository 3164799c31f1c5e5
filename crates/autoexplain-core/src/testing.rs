//! In-memory connection for exercising sessions and callbacks without a server
//!
//! ```ignore
//! let conn = ScriptedConnection::new()
//!     .respond("EXPLAIN FORMAT=JSON ", r#"{"query_block":{"cost_info":{"query_cost":"1.00"}}}"#)
//!     .delay("FROM orders", Duration::from_millis(50));
//! let session = Session::new(Arc::new(conn));
//! ```

use crate::{ColumnMeta, Connection, DbError, QueryResult, Result, Row, StatementResult, Value};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A statement seen by a [`ScriptedConnection`]
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(Option<String>),
    Fail(String),
}

/// Connection returning canned replies.
///
/// Replies are matched by SQL prefix in the order they were added. A query
/// with no matching reply returns an empty result set; a statement with no
/// matching reply reports one affected row. Delays are matched by substring
/// and applied before the reply.
#[derive(Default)]
pub struct ScriptedConnection {
    replies: Vec<(String, Reply)>,
    delays: Vec<(String, Duration)>,
    executed: Mutex<Vec<Executed>>,
    closed: AtomicBool,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to SQL starting with `prefix` with a single text cell.
    pub fn respond(mut self, prefix: impl Into<String>, text: impl Into<String>) -> Self {
        self.replies
            .push((prefix.into(), Reply::Text(Some(text.into()))));
        self
    }

    /// Reply to SQL starting with `prefix` with a single NULL cell.
    pub fn respond_null(mut self, prefix: impl Into<String>) -> Self {
        self.replies.push((prefix.into(), Reply::Text(None)));
        self
    }

    /// Fail SQL starting with `prefix` with a query error.
    pub fn fail(mut self, prefix: impl Into<String>, message: impl Into<String>) -> Self {
        self.replies
            .push((prefix.into(), Reply::Fail(message.into())));
        self
    }

    /// Sleep for `duration` before answering SQL containing `needle`.
    pub fn delay(mut self, needle: impl Into<String>, duration: Duration) -> Self {
        self.delays.push((needle.into(), duration));
        self
    }

    /// Every statement received so far, in arrival order
    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().clone()
    }

    /// Statements received whose SQL starts with `prefix`
    pub fn executed_with_prefix(&self, prefix: &str) -> Vec<Executed> {
        self.executed
            .lock()
            .iter()
            .filter(|e| e.sql.starts_with(prefix))
            .cloned()
            .collect()
    }

    async fn receive(&self, sql: &str, params: &[Value]) -> Option<Reply> {
        self.executed.lock().push(Executed {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let delay = self
            .delays
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn driver_name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        match self.receive(sql, params).await {
            Some(Reply::Fail(message)) => Err(DbError::Query(message)),
            _ => Ok(StatementResult {
                affected_rows: 1,
                last_insert_id: None,
            }),
        }
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        match self.receive(sql, params).await {
            Some(Reply::Fail(message)) => Err(DbError::Query(message)),
            Some(Reply::Text(text)) => {
                let value = text.map(Value::String).unwrap_or(Value::Null);
                let mut result = QueryResult::empty();
                result.columns = vec![ColumnMeta::new("EXPLAIN", "JSON", 0)];
                result.rows = vec![Row::new(result.column_names(), vec![value])];
                Ok(result)
            }
            None => Ok(QueryResult::empty()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
