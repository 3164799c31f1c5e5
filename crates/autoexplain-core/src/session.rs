//! Session handle that runs statements through the callback chain

use crate::{
    Callbacks, ColumnMeta, Connection, DbError, Dispatch, ExecutionPath, Outcome, Plugin,
    QueryResult, Result, Row, Statement, StatementResult, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A cheaply cloneable handle for issuing statements.
///
/// Every statement issued through a session runs the Before callbacks of its
/// path, the connection call, then the After callbacks, and only then returns
/// to the caller. Callbacks observe the statement but cannot change what the
/// caller receives.
///
/// Sessions created with [`with_setting`](Self::with_setting) share the
/// connection and callback registry of their parent but carry extra
/// accumulated settings. [`reset`](Self::reset) drops those settings again.
#[derive(Clone)]
pub struct Session {
    conn: Arc<dyn Connection>,
    callbacks: Arc<Callbacks>,
    settings: Arc<BTreeMap<String, Value>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("driver", &self.conn.driver_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Session {
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        Self {
            conn,
            callbacks: Arc::new(Callbacks::new()),
            settings: Arc::new(BTreeMap::new()),
        }
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.conn
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Install a plugin. Fails if a plugin with the same name is already
    /// installed or if the plugin's own initialization fails.
    pub fn use_plugin<P: Plugin + ?Sized>(&self, plugin: &P) -> Result<()> {
        let name = plugin.name().to_string();
        self.callbacks.claim_plugin(&name)?;
        if let Err(e) = plugin.initialize(self) {
            tracing::error!(plugin = %name, error = %e, "plugin initialization failed");
            self.callbacks.release_plugin(&name);
            return Err(e);
        }
        tracing::info!(plugin = %name, "plugin installed");
        Ok(())
    }

    /// Derive a session carrying one more setting.
    pub fn with_setting(&self, key: impl Into<String>, value: impl Into<Value>) -> Session {
        let mut settings = (*self.settings).clone();
        settings.insert(key.into(), value.into());
        Session {
            conn: self.conn.clone(),
            callbacks: self.callbacks.clone(),
            settings: Arc::new(settings),
        }
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// A session over the same connection and callbacks with no accumulated
    /// settings.
    pub fn reset(&self) -> Session {
        Session {
            conn: self.conn.clone(),
            callbacks: self.callbacks.clone(),
            settings: Arc::new(BTreeMap::new()),
        }
    }

    /// Run a query on the query path.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.run(ExecutionPath::Query, Dispatch::Query, sql, params)
            .await
            .into_rows()
    }

    /// Run raw SQL that returns rows.
    pub async fn raw(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.run(ExecutionPath::Raw, Dispatch::Query, sql, params)
            .await
            .into_rows()
    }

    /// Run raw SQL that does not return rows.
    pub async fn exec(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        self.run(ExecutionPath::Raw, Dispatch::Execute, sql, params)
            .await
            .into_affected()
    }

    /// Run raw SQL and scan the first column of the first row as text.
    ///
    /// Returns `Ok(None)` when the query yields no rows or a NULL.
    pub async fn raw_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<String>> {
        let result = self.raw(sql, params).await?;
        Ok(result.first_value().and_then(Value::to_text))
    }

    /// Run a query on the row path and iterate its rows.
    pub async fn rows(&self, sql: &str, params: &[Value]) -> Result<Rows> {
        let result = self
            .run(ExecutionPath::Row, Dispatch::Query, sql, params)
            .await
            .into_rows()?;
        Ok(Rows::new(result))
    }

    async fn run(
        &self,
        path: ExecutionPath,
        dispatch: Dispatch,
        sql: &str,
        params: &[Value],
    ) -> Statement {
        let chain = self.callbacks.chain(path);
        let mut stmt = Statement::new(path, dispatch, sql, params.to_vec(), self.settings.clone());

        for callback in &chain.before {
            callback.call(self, &mut stmt).await;
        }

        tracing::trace!(path = %path, sql_preview = %sql.chars().take(100).collect::<String>(), "dispatching statement");
        match dispatch {
            Dispatch::Query => match self.conn.query(stmt.sql(), stmt.params()).await {
                Ok(result) => stmt.outcome = Some(Outcome::Rows(result)),
                Err(e) => stmt.error = Some(e),
            },
            Dispatch::Execute => match self.conn.execute(stmt.sql(), stmt.params()).await {
                Ok(result) => stmt.outcome = Some(Outcome::Affected(result)),
                Err(e) => stmt.error = Some(e),
            },
        }

        for callback in &chain.after {
            callback.call(self, &mut stmt).await;
        }
        stmt
    }
}

impl Statement {
    fn into_rows(mut self) -> Result<QueryResult> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        match self.outcome.take() {
            Some(Outcome::Rows(result)) => Ok(result),
            Some(Outcome::Affected(_)) | None => Err(DbError::Other(format!(
                "{} statement produced no result set",
                self.path()
            ))),
        }
    }

    fn into_affected(mut self) -> Result<StatementResult> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        match self.outcome.take() {
            Some(Outcome::Affected(result)) => Ok(result),
            Some(Outcome::Rows(result)) => Ok(StatementResult {
                affected_rows: result.affected_rows,
                last_insert_id: None,
            }),
            None => Err(DbError::Other(format!(
                "{} statement produced no result",
                self.path()
            ))),
        }
    }
}

/// Rows returned on the row path.
#[derive(Debug)]
pub struct Rows {
    columns: Vec<ColumnMeta>,
    inner: std::vec::IntoIter<Row>,
}

impl Rows {
    fn new(result: QueryResult) -> Self {
        Self {
            columns: result.columns,
            inner: result.rows.into_iter(),
        }
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
