//! autoexplain core - the database access layer that autoexplain instruments
//!
//! This crate provides the traits and types the plugin hooks into:
//!
//! - `Connection` - Trait for database driver connections
//! - `Session` - Handle that runs statements through named callbacks
//! - `Callbacks` - Registry of before/after callbacks per execution path
//! - `Statement` - Per-call execution context handed to callbacks
//! - `Plugin` - Trait for extensions that install callbacks
//! - Common types like `Value`, `Row`, `QueryResult`

mod callbacks;
mod connection;
mod error;
mod plugin;
mod session;
mod statement;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
mod types;

pub use callbacks::*;
pub use connection::*;
pub use error::*;
pub use plugin::*;
pub use session::*;
pub use statement::*;
pub use types::*;
