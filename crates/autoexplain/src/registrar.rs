//! Installs the before/after hook pair on every execution path

use crate::{PLUGIN_NAME, PluginError};
use autoexplain_core::{Callback, ExecutionPath, Session, Stage};
use std::sync::Arc;

/// Name under which a hook is registered, e.g. `auto_explain:after_raw`
pub fn hook_name(stage: Stage, path: ExecutionPath) -> String {
    let stage = match stage {
        Stage::Before => "before",
        Stage::After => "after",
    };
    format!("{}:{}_{}", PLUGIN_NAME, stage, path)
}

/// Register `before` and `after` on the query, raw, and row paths.
///
/// Either all six hooks end up registered or none do: every registration is
/// attempted, and if any fails the ones that succeeded are removed again and
/// the first failure is returned.
pub(crate) fn register(
    session: &Session,
    before: Arc<dyn Callback>,
    after: Arc<dyn Callback>,
) -> Result<(), PluginError> {
    let callbacks = session.callbacks();
    let mut registered = Vec::with_capacity(6);
    let mut first_failure = None;

    let hooks = [Stage::Before, Stage::After].into_iter().flat_map(|stage| {
        ExecutionPath::ALL.into_iter().map(move |path| (stage, path))
    });
    for (stage, path) in hooks {
        let name = hook_name(stage, path);
        let callback = match stage {
            Stage::Before => before.clone(),
            Stage::After => after.clone(),
        };
        match callbacks.register(path, stage, name.clone(), callback) {
            Ok(()) => registered.push((path, name)),
            Err(source) => {
                tracing::error!(hook = %name, error = %source, "failed to register hook");
                if first_failure.is_none() {
                    first_failure = Some(PluginError::Registration { hook: name, source });
                }
            }
        }
    }

    match first_failure {
        None => Ok(()),
        Some(err) => {
            for (path, name) in registered {
                callbacks.remove(path, &name);
            }
            Err(err)
        }
    }
}
