//! Error types for the autoexplain plugin

use autoexplain_core::DbError;
use thiserror::Error;

/// Errors surfaced to whoever attaches or configures the plugin
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Failed to register hook '{hook}': {source}")]
    Registration {
        hook: String,
        #[source]
        source: DbError,
    },

    #[error("Invalid skip pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while analyzing one statement.
///
/// These never reach the code that issued the statement; the hook logs them
/// and skips delivery for that statement.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Explain query failed: {0}")]
    Execute(#[source] DbError),

    #[error("Empty explain response")]
    EmptyResponse,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid explain structure: {0}")]
    InvalidStructure(String),
}
