//! Delivers explain results to registered observers

use crate::ExplainResult;
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Observer called once per analyzed statement.
///
/// Observers run synchronously on the task that issued the statement, so a
/// slow observer delays the caller.
pub type OnExplain = Arc<dyn Fn(ExplainResult) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Notifier {
    observers: RwLock<Vec<OnExplain>>,
}

impl Notifier {
    pub(crate) fn attach(&self, observer: OnExplain) {
        self.observers.write().push(observer);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Call every observer in registration order. A panicking observer is
    /// logged and does not stop the rest.
    pub(crate) fn notify(&self, result: &ExplainResult) {
        let observers = self.observers.read().clone();
        for (index, observer) in observers.iter().enumerate() {
            let delivered = result.clone();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| observer(delivered))) {
                tracing::error!(
                    observer = index,
                    panic = %panic_message(panic.as_ref()),
                    sql_preview = %result.query.chars().take(100).collect::<String>(),
                    "explain observer panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.len())
            .finish()
    }
}
