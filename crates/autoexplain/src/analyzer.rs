//! Re-runs a statement under the explain clause and reads the plan summary
//!
//! MySQL's `EXPLAIN FORMAT=JSON` returns a single text column shaped like:
//!
//! ```json
//! {
//!   "query_block": {
//!     "select_id": 1,
//!     "message": "no matching row in const table",
//!     "cost_info": {
//!       "query_cost": "1.00"
//!     }
//!   }
//! }
//! ```
//!
//! Only the top-level message and cost are read, plus whether any nested
//! block reports `"using_temporary_table": true`.

use crate::{AnalyzeError, ExplainResult};
use autoexplain_core::{Session, Statement};
use serde_json::Value;
use std::time::Duration;

/// Fields read from one explain response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplainSummary {
    pub message: String,
    pub query_cost: f64,
    pub using_temporary_table: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Analyzer {
    explain_clause: String,
}

impl Analyzer {
    pub(crate) fn new(explain_clause: impl Into<String>) -> Self {
        Self {
            explain_clause: explain_clause.into(),
        }
    }

    /// Issue `<clause><sql>` with the statement's original parameters on a
    /// reset session and turn the response into an [`ExplainResult`].
    #[tracing::instrument(skip(self, session, stmt), fields(sql_preview = %stmt.sql().chars().take(100).collect::<String>()))]
    pub(crate) async fn analyze(
        &self,
        session: &Session,
        stmt: &Statement,
        elapsed: Duration,
    ) -> Result<ExplainResult, AnalyzeError> {
        let explain_sql = format!("{}{}", self.explain_clause, stmt.sql());
        let raw = session
            .reset()
            .raw_scalar(&explain_sql, stmt.params())
            .await
            .map_err(AnalyzeError::Execute)?
            .ok_or(AnalyzeError::EmptyResponse)?;

        let summary = parse_explain_response(&raw)?;
        tracing::debug!(
            query_cost = summary.query_cost,
            using_temporary_table = summary.using_temporary_table,
            "explain parsed"
        );

        Ok(ExplainResult {
            duration: elapsed,
            message: summary.message,
            query_cost: summary.query_cost,
            using_temporary_table: summary.using_temporary_table,
            raw,
            query: stmt.sql().to_string(),
        })
    }
}

/// Parse a JSON explain response.
///
/// A missing `query_block`, message, or cost is not an error: the summary
/// falls back to an empty message and a cost of 0. Text that is not JSON,
/// or JSON whose top level is not an object, is.
pub fn parse_explain_response(raw: &str) -> Result<ExplainSummary, AnalyzeError> {
    if raw.trim().is_empty() {
        return Err(AnalyzeError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(raw)?;
    let Some(root) = value.as_object() else {
        return Err(AnalyzeError::InvalidStructure(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    };

    let Some(query_block) = root.get("query_block") else {
        return Ok(ExplainSummary::default());
    };

    let message = query_block
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let query_cost = query_block
        .get("cost_info")
        .and_then(|c| c.get("query_cost"))
        .and_then(parse_cost)
        .unwrap_or(0.0);

    Ok(ExplainSummary {
        message,
        query_cost,
        using_temporary_table: uses_temporary_table(query_block),
    })
}

// MySQL renders costs as strings ("1.00"); accept plain numbers as well.
fn parse_cost(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .filter(|cost| cost.is_finite())
}

fn uses_temporary_table(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(key, v)| {
            (key == "using_temporary_table" && v.as_bool() == Some(true)) || uses_temporary_table(v)
        }),
        Value::Array(items) => items.iter().any(uses_temporary_table),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
