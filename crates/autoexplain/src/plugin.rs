//! The plugin value integrators construct and install on a session

use crate::analyzer::Analyzer;
use crate::notifier::{Notifier, OnExplain};
use crate::timing::RecordStart;
use crate::{AutoExplainConfig, ExplainResult, PluginError, SkipFilter, Verdict, controller, registrar};
use async_trait::async_trait;
use autoexplain_core::{Callback, DbError, Plugin, Session, Statement};
use std::sync::Arc;
use std::time::Duration;

/// Name used for duplicate detection and as the hook-name prefix
pub const PLUGIN_NAME: &str = "auto_explain";

/// Re-runs slow statements under an explain clause and reports the plan
/// summary to observers.
///
/// ```ignore
/// let plugin = AutoExplain::new(Duration::from_millis(200))
///     .on_explain(observers::heavy_query(100.0));
/// session.use_plugin(&plugin)?;
/// ```
///
/// Clones share the same observer list, so observers attached through
/// [`attach`](Self::attach) after installation still receive results.
#[derive(Clone, Debug)]
pub struct AutoExplain {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: AutoExplainConfig,
    filter: SkipFilter,
    analyzer: Analyzer,
    notifier: Notifier,
}

impl AutoExplain {
    /// Plugin with the given duration threshold and default settings.
    pub fn new(duration_threshold: Duration) -> Self {
        let config = AutoExplainConfig::default().with_duration_threshold(duration_threshold);
        let filter = SkipFilter::new(config.explain_clause.clone(), config.duration_threshold);
        Self::build(config, filter)
    }

    pub fn from_config(config: AutoExplainConfig) -> Result<Self, PluginError> {
        let filter = SkipFilter::new(config.explain_clause.clone(), config.duration_threshold)
            .with_patterns(&config.skip_patterns)?;
        Ok(Self::build(config, filter))
    }

    fn build(config: AutoExplainConfig, filter: SkipFilter) -> Self {
        Self {
            inner: Arc::new(Inner {
                analyzer: Analyzer::new(config.explain_clause.clone()),
                config,
                filter,
                notifier: Notifier::default(),
            }),
        }
    }

    pub fn on_explain<F>(self, observer: F) -> Self
    where
        F: Fn(ExplainResult) + Send + Sync + 'static,
    {
        self.attach(observer);
        self
    }

    pub fn attach<F>(&self, observer: F)
    where
        F: Fn(ExplainResult) + Send + Sync + 'static,
    {
        let observer: OnExplain = Arc::new(observer);
        self.inner.notifier.attach(observer);
    }

    pub fn config(&self) -> &AutoExplainConfig {
        &self.inner.config
    }

    pub fn observer_count(&self) -> usize {
        self.inner.notifier.len()
    }

    /// Evaluate, analyze, and notify for one completed statement. Never
    /// fails; every problem is logged and swallowed.
    async fn inspect(&self, session: &Session, stmt: &Statement) {
        let inner = &self.inner;
        let elapsed = stmt.elapsed().unwrap_or_else(|| {
            tracing::debug!(sql_preview = %preview(stmt.sql()), "no start time recorded, treating duration as zero");
            Duration::ZERO
        });

        if let Verdict::Skip(reason) = inner.filter.evaluate(stmt, elapsed, controller::is_enabled()) {
            tracing::debug!(%reason, sql_preview = %preview(stmt.sql()), "skipping explain");
            return;
        }

        tracing::debug!(
            path = %stmt.path(),
            sql = %stmt.sql(),
            params = ?stmt.params(),
            duration = ?elapsed,
            "analyzing statement"
        );
        if inner.config.capture_call_sites {
            tracing::trace!(backtrace = %std::backtrace::Backtrace::force_capture(), "explain call site");
        }

        match inner.analyzer.analyze(session, stmt, elapsed).await {
            Ok(result) => {
                tracing::trace!(raw = %result.raw, "explain response");
                inner.notifier.notify(&result);
            }
            Err(e) => {
                tracing::warn!(error = %e, sql_preview = %preview(stmt.sql()), "explain failed");
            }
        }
    }
}

fn preview(sql: &str) -> String {
    sql.chars().take(100).collect()
}

struct ExplainHook(AutoExplain);

#[async_trait]
impl Callback for ExplainHook {
    async fn call(&self, session: &Session, stmt: &mut Statement) {
        self.0.inspect(session, stmt).await;
    }
}

impl Plugin for AutoExplain {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn initialize(&self, session: &Session) -> autoexplain_core::Result<()> {
        registrar::register(session, Arc::new(RecordStart), Arc::new(ExplainHook(self.clone()))).map_err(
            |e| DbError::Plugin {
                name: PLUGIN_NAME.to_string(),
                source: Box::new(e),
            },
        )
    }
}
