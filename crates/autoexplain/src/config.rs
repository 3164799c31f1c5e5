//! Plugin configuration

use crate::PluginError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// MySQL's JSON plan directive
pub const DEFAULT_EXPLAIN_CLAUSE: &str = "EXPLAIN FORMAT=JSON ";

/// Configuration for [`AutoExplain`](crate::AutoExplain).
///
/// ```toml
/// duration_threshold_ms = 200
/// explain_clause = "EXPLAIN FORMAT=JSON "
/// skip_patterns = ['(?i)^\s*show\s+']
/// capture_call_sites = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoExplainConfig {
    /// Statements faster than this are not analyzed; zero analyzes everything
    #[serde(rename = "duration_threshold_ms", with = "millis")]
    pub duration_threshold: Duration,
    /// Prefix prepended verbatim to the original SQL
    pub explain_clause: String,
    /// Extra regexes; a statement matching any of them is not analyzed
    pub skip_patterns: Vec<String>,
    /// Log a backtrace of the issuing call site at TRACE before each analysis
    pub capture_call_sites: bool,
}

impl Default for AutoExplainConfig {
    fn default() -> Self {
        Self {
            duration_threshold: Duration::ZERO,
            explain_clause: DEFAULT_EXPLAIN_CLAUSE.to_string(),
            skip_patterns: Vec::new(),
            capture_call_sites: false,
        }
    }
}

impl AutoExplainConfig {
    pub fn with_duration_threshold(mut self, threshold: Duration) -> Self {
        self.duration_threshold = threshold;
        self
    }

    pub fn with_explain_clause(mut self, clause: impl Into<String>) -> Self {
        self.explain_clause = clause.into();
        self
    }

    pub fn with_skip_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.skip_patterns.push(pattern.into());
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PluginError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PluginError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// Whole milliseconds on disk. A sub-millisecond threshold is written as
/// 1 so that it never turns into "analyze everything".
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = value.as_nanos().div_ceil(1_000_000);
        serializer.serialize_u64(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
