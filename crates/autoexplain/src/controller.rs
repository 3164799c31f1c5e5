//! Process-wide switch for suspending analysis

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Enable or disable analysis for every installed plugin.
///
/// Takes effect for the next statement that completes; hooks stay registered.
/// Typically used to bracket schema migrations or bulk loads.
pub fn toggle(enabled: bool) {
    ENABLED.store(enabled, Ordering::Release);
    tracing::debug!(enabled, "auto explain toggled");
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Acquire)
}
