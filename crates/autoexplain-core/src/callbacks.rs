//! Named before/after callbacks around each execution path

use crate::{DbError, ExecutionPath, Result, Session, Statement};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Position of a callback relative to the connection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Before,
    After,
}

/// A hook invoked around statement execution.
///
/// `session` is the session that issued the statement. Callbacks that need to
/// run SQL of their own should do so through [`Session::reset`] so they do not
/// inherit the issuing session's accumulated settings.
#[async_trait]
pub trait Callback: Send + Sync {
    async fn call(&self, session: &Session, stmt: &mut Statement);
}

/// Adapter turning a synchronous closure into a [`Callback`].
pub struct FnCallback<F>(pub F);

#[async_trait]
impl<F> Callback for FnCallback<F>
where
    F: Fn(&mut Statement) + Send + Sync,
{
    async fn call(&self, _session: &Session, stmt: &mut Statement) {
        (self.0)(stmt)
    }
}

struct Registered {
    name: String,
    callback: Arc<dyn Callback>,
}

#[derive(Default)]
struct Processor {
    before: Vec<Registered>,
    after: Vec<Registered>,
}

impl Processor {
    fn contains(&self, name: &str) -> bool {
        self.before.iter().chain(self.after.iter()).any(|r| r.name == name)
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut Vec<Registered> {
        match stage {
            Stage::Before => &mut self.before,
            Stage::After => &mut self.after,
        }
    }
}

/// Callbacks snapshotted for one statement execution.
pub(crate) struct Chain {
    pub before: Vec<Arc<dyn Callback>>,
    pub after: Vec<Arc<dyn Callback>>,
}

/// Registry of callbacks for the query, raw, and row paths.
///
/// Callbacks run in registration order within their stage. Names are unique
/// per path; registering a second callback under an existing name fails.
#[derive(Default)]
pub struct Callbacks {
    processors: RwLock<[Processor; 3]>,
    plugins: RwLock<Vec<String>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        path: ExecutionPath,
        stage: Stage,
        name: impl Into<String>,
        callback: Arc<dyn Callback>,
    ) -> Result<()> {
        let name = name.into();
        let mut processors = self.processors.write();
        let processor = &mut processors[path.index()];
        if processor.contains(&name) {
            tracing::warn!(path = %path, name = %name, "callback already registered");
            return Err(DbError::DuplicateCallback { path, name });
        }
        tracing::debug!(path = %path, name = %name, ?stage, "registering callback");
        processor.stage_mut(stage).push(Registered { name, callback });
        Ok(())
    }

    /// Remove a callback by name. Returns whether anything was removed.
    pub fn remove(&self, path: ExecutionPath, name: &str) -> bool {
        let mut processors = self.processors.write();
        let processor = &mut processors[path.index()];
        let before = processor.before.len() + processor.after.len();
        processor.before.retain(|r| r.name != name);
        processor.after.retain(|r| r.name != name);
        before != processor.before.len() + processor.after.len()
    }

    /// Registered callback names for a path and stage, in execution order
    pub fn names(&self, path: ExecutionPath, stage: Stage) -> Vec<String> {
        let processors = self.processors.read();
        let processor = &processors[path.index()];
        let list = match stage {
            Stage::Before => &processor.before,
            Stage::After => &processor.after,
        };
        list.iter().map(|r| r.name.clone()).collect()
    }

    pub(crate) fn chain(&self, path: ExecutionPath) -> Chain {
        let processors = self.processors.read();
        let processor = &processors[path.index()];
        Chain {
            before: processor.before.iter().map(|r| r.callback.clone()).collect(),
            after: processor.after.iter().map(|r| r.callback.clone()).collect(),
        }
    }

    pub(crate) fn claim_plugin(&self, name: &str) -> Result<()> {
        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p == name) {
            return Err(DbError::DuplicatePlugin(name.to_string()));
        }
        plugins.push(name.to_string());
        Ok(())
    }

    pub(crate) fn release_plugin(&self, name: &str) {
        self.plugins.write().retain(|p| p != name);
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.read().iter().any(|p| p == name)
    }
}

#[cfg(test)]
mod tests;
