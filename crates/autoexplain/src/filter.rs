//! Decides whether a completed statement is worth analyzing
//!
//! The internal-query patterns are plain regular expressions over the raw
//! SQL text, not a SQL parser. They catch the metadata queries drivers and
//! migration tools commonly issue; unusual shapes (for example a catalog
//! table referenced only inside a subquery join) can slip through. Extra
//! patterns can be supplied through
//! [`AutoExplainConfig::skip_patterns`](crate::AutoExplainConfig::skip_patterns).

use crate::PluginError;
use autoexplain_core::Statement;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use std::time::Duration;

/// Queries against the catalog schema
pub const INFORMATION_SCHEMA_PATTERN: &str = r"from\s+information_schema\.";
/// Queries for the current database name
pub const SELECT_DATABASE_PATTERN: &str = r"select\s+database\(\s*\)";

static BUILTIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [INFORMATION_SCHEMA_PATTERN, SELECT_DATABASE_PATTERN]
        .into_iter()
        .map(|p| compile(p).expect("valid regex"))
        .collect()
});

/// Why a statement was not analyzed
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Disabled,
    BelowThreshold { elapsed: Duration, threshold: Duration },
    ExecutionFailed,
    EmptySql,
    AlreadyExplained,
    InternalQuery { pattern: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "analysis disabled"),
            SkipReason::BelowThreshold { elapsed, threshold } => {
                write!(f, "duration {:?} below threshold {:?}", elapsed, threshold)
            }
            SkipReason::ExecutionFailed => write!(f, "statement failed"),
            SkipReason::EmptySql => write!(f, "empty SQL"),
            SkipReason::AlreadyExplained => write!(f, "already an explain query"),
            SkipReason::InternalQuery { pattern } => write!(f, "internal query matching {}", pattern),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Analyze,
    Skip(SkipReason),
}

impl Verdict {
    pub fn is_analyze(&self) -> bool {
        matches!(self, Verdict::Analyze)
    }
}

/// Skip predicates, evaluated in a fixed order: global switch, duration
/// threshold, execution error, empty SQL, explain prefix, internal patterns.
#[derive(Debug, Clone)]
pub struct SkipFilter {
    explain_clause: String,
    threshold: Duration,
    patterns: Vec<Regex>,
}

fn compile(pattern: &str) -> Result<Regex, PluginError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| PluginError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl SkipFilter {
    /// Build a filter with the built-in internal-query patterns.
    pub fn new(explain_clause: impl Into<String>, threshold: Duration) -> Self {
        Self {
            explain_clause: explain_clause.into(),
            threshold,
            patterns: BUILTIN_PATTERNS.clone(),
        }
    }

    /// Add patterns checked after the built-in ones.
    pub fn with_patterns(mut self, extra: &[String]) -> Result<Self, PluginError> {
        for pattern in extra {
            self.patterns.push(compile(pattern)?);
        }
        Ok(self)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn explain_clause(&self) -> &str {
        &self.explain_clause
    }

    pub fn evaluate(&self, stmt: &Statement, elapsed: Duration, enabled: bool) -> Verdict {
        self.evaluate_parts(stmt.sql(), stmt.has_error(), elapsed, enabled)
    }

    pub fn evaluate_parts(&self, sql: &str, failed: bool, elapsed: Duration, enabled: bool) -> Verdict {
        if !enabled {
            return Verdict::Skip(SkipReason::Disabled);
        }
        if !self.threshold.is_zero() && elapsed < self.threshold {
            return Verdict::Skip(SkipReason::BelowThreshold {
                elapsed,
                threshold: self.threshold,
            });
        }
        if failed {
            return Verdict::Skip(SkipReason::ExecutionFailed);
        }
        if sql.is_empty() {
            return Verdict::Skip(SkipReason::EmptySql);
        }
        if sql.starts_with(&self.explain_clause) {
            return Verdict::Skip(SkipReason::AlreadyExplained);
        }
        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(sql)) {
            return Verdict::Skip(SkipReason::InternalQuery {
                pattern: pattern.as_str().to_string(),
            });
        }
        Verdict::Analyze
    }
}
