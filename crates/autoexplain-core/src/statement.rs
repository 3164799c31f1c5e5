//! Per-call execution context shared by callbacks

use crate::{DbError, QueryResult, StatementResult, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The statement-execution paths a caller may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionPath {
    /// Structured query returning a full result set
    Query,
    /// Raw SQL, either returning rows or only an affected-row count
    Raw,
    /// Row streaming
    Row,
}

impl ExecutionPath {
    pub const ALL: [ExecutionPath; 3] = [ExecutionPath::Query, ExecutionPath::Raw, ExecutionPath::Row];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPath::Query => "query",
            ExecutionPath::Raw => "raw",
            ExecutionPath::Row => "row",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ExecutionPath::Query => 0,
            ExecutionPath::Raw => 1,
            ExecutionPath::Row => 2,
        }
    }
}

impl std::fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the connection is asked to run the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `Connection::query`
    Query,
    /// `Connection::execute`
    Execute,
}

/// What the connection returned for a statement.
#[derive(Debug, Clone)]
pub enum Outcome {
    Rows(QueryResult),
    Affected(StatementResult),
}

/// Mutable state for one in-flight statement.
///
/// A `Statement` is created by the [`Session`](crate::Session) for every call
/// and handed to each registered callback in turn. It is never shared between
/// calls, so callbacks may write to it freely.
#[derive(Debug)]
pub struct Statement {
    path: ExecutionPath,
    dispatch: Dispatch,
    sql: String,
    params: Vec<Value>,
    settings: Arc<BTreeMap<String, Value>>,
    started_at: Option<Instant>,
    /// Error reported by the connection, if any
    pub error: Option<DbError>,
    /// Result reported by the connection, if any
    pub outcome: Option<Outcome>,
}

impl Statement {
    pub(crate) fn new(
        path: ExecutionPath,
        dispatch: Dispatch,
        sql: impl Into<String>,
        params: Vec<Value>,
        settings: Arc<BTreeMap<String, Value>>,
    ) -> Self {
        Self {
            path,
            dispatch,
            sql: sql.into(),
            params,
            settings,
            started_at: None,
            error: None,
            outcome: None,
        }
    }

    pub fn path(&self) -> ExecutionPath {
        self.path
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// SQL text as issued, with placeholders intact
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameter values, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Setting inherited from the issuing session
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Record the current instant as the start of execution.
    pub fn mark_started(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Time since [`mark_started`](Self::mark_started), or `None` if no start was recorded.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| start.elapsed())
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
