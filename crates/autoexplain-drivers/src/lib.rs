//! autoexplain drivers - `Connection` implementations
//!
//! Each driver lives in its own crate and is enabled by the feature of the
//! same name.

#[cfg(feature = "mysql")]
pub use autoexplain_driver_mysql as mysql;
#[cfg(feature = "sqlite")]
pub use autoexplain_driver_sqlite as sqlite;

/// Re-export commonly used types from autoexplain-core
pub use autoexplain_core::{
    ColumnMeta, Connection, DbError, QueryResult, Result, Row, Session, StatementResult, Value,
};
