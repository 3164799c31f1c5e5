//! Plugin trait

use crate::{Result, Session};

/// An extension that installs callbacks on a session's registry.
pub trait Plugin: Send + Sync {
    /// Unique plugin name; a session accepts each name once.
    fn name(&self) -> &str;

    /// Register the plugin's callbacks.
    fn initialize(&self, session: &Session) -> Result<()>;
}
