//! Automatic EXPLAIN for slow statements
//!
//! Install [`AutoExplain`] on an [`autoexplain_core::Session`] and every
//! statement that runs at least as long as the configured threshold is
//! re-issued as `EXPLAIN FORMAT=JSON <sql>` with the same parameters. The
//! plan's message and estimated cost are handed to observers as an
//! [`ExplainResult`].
//!
//! Analysis happens after the statement completes and never changes what the
//! caller receives: failures of the explain query, unparseable plans, and
//! panicking observers are logged and otherwise ignored. The only error an
//! integrator sees is a failure to install the plugin.
//!
//! Statements issued by the analysis itself, queries against
//! `information_schema`, and `SELECT DATABASE()` are never analyzed.

mod analyzer;
mod config;
mod controller;
mod error;
mod filter;
mod notifier;
pub mod observers;
mod plugin;
mod registrar;
mod result;
mod timing;

pub use analyzer::{ExplainSummary, parse_explain_response};
pub use config::{AutoExplainConfig, DEFAULT_EXPLAIN_CLAUSE};
pub use controller::{is_enabled, toggle};
pub use error::{AnalyzeError, PluginError};
pub use filter::{INFORMATION_SCHEMA_PATTERN, SELECT_DATABASE_PATTERN, SkipFilter, SkipReason, Verdict};
pub use notifier::OnExplain;
pub use plugin::{AutoExplain, PLUGIN_NAME};
pub use registrar::hook_name;
pub use result::ExplainResult;
