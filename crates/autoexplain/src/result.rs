//! Result delivered to observers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of analyzing one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResult {
    /// Elapsed time of the original statement, measured from the before hook
    /// to the after hook
    pub duration: Duration,
    /// Planner message (e.g. "no matching row in const table"), often empty
    pub message: String,
    /// Estimated query cost; 0 when the response carries none
    pub query_cost: f64,
    /// Whether the plan materializes a temporary table
    pub using_temporary_table: bool,
    /// Explain response exactly as returned by the database
    pub raw: String,
    /// Original SQL text with its placeholders
    pub query: String,
}
