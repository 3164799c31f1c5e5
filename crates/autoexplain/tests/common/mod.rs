//! Shared helpers for autoexplain integration tests

#![allow(dead_code)]

use autoexplain::{AutoExplain, ExplainResult};
use autoexplain_core::Session;
use autoexplain_core::testing::ScriptedConnection;
use parking_lot::Mutex;
use std::sync::Arc;

pub const CLAUSE: &str = "EXPLAIN FORMAT=JSON ";

pub const PLAN: &str = r#"{"query_block":{"select_id":1,"message":"m","cost_info":{"query_cost":"12.5"}}}"#;

/// Observer that keeps every result it receives
#[derive(Clone, Default)]
pub struct Collected(Arc<Mutex<Vec<ExplainResult>>>);

impl Collected {
    pub fn observer(&self) -> impl Fn(ExplainResult) + Send + Sync + 'static {
        let inner = self.0.clone();
        move |result: ExplainResult| inner.lock().push(result)
    }

    pub fn results(&self) -> Vec<ExplainResult> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Session over `conn` with `plugin` installed
pub fn install(conn: ScriptedConnection, plugin: &AutoExplain) -> (Session, Arc<ScriptedConnection>) {
    init_tracing();
    let conn = Arc::new(conn);
    let session = Session::new(conn.clone());
    session.use_plugin(plugin).unwrap();
    (session, conn)
}
