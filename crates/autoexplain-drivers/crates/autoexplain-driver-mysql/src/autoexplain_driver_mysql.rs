//! MySQL/MariaDB connection implementation
//!
//! MySQL is the dialect the default explain clause (`EXPLAIN FORMAT=JSON `)
//! targets, so this is the driver autoexplain is normally used with.

mod connection;

pub use connection::MySqlConnection;
