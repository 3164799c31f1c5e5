//! Ready-made observers that report through `tracing`

use crate::ExplainResult;

/// Log every result at DEBUG.
pub fn log_result() -> impl Fn(ExplainResult) + Send + Sync + 'static {
    |result: ExplainResult| {
        tracing::debug!(
            query = %result.query,
            query_cost = result.query_cost,
            duration = ?result.duration,
            using_temporary_table = result.using_temporary_table,
            raw = %result.raw,
            "explain result"
        );
    }
}

/// Log non-empty planner messages at INFO.
pub fn planner_notice() -> impl Fn(ExplainResult) + Send + Sync + 'static {
    |result: ExplainResult| {
        if !result.message.is_empty() {
            tracing::info!(query = %result.query, message = %result.message, "planner notice");
        }
    }
}

/// Warn about results whose estimated cost exceeds `cost_threshold`.
pub fn heavy_query(cost_threshold: f64) -> impl Fn(ExplainResult) + Send + Sync + 'static {
    move |result: ExplainResult| {
        if result.query_cost > cost_threshold {
            tracing::warn!(
                query = %result.query,
                query_cost = result.query_cost,
                cost_threshold,
                duration = ?result.duration,
                "heavy query"
            );
        }
    }
}
