//! Before hook: stamps the statement's start time

use async_trait::async_trait;
use autoexplain_core::{Callback, Session, Statement};

/// Records when a statement started so the after hook can compute its
/// duration.
pub(crate) struct RecordStart;

#[async_trait]
impl Callback for RecordStart {
    async fn call(&self, _session: &Session, stmt: &mut Statement) {
        stmt.mark_started();
    }
}
