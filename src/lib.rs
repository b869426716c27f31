// Core infrastructure modules
pub mod core;

// Connection configuration
pub mod config;

pub use crate::core::db::{BindValue, ColumnType, Connection, Statement, IN_MEMORY};
pub use crate::core::{LiteError, Result, SqlError, SqlResult};
pub use config::ConnectionConfig;

#[cfg(test)]
mod test_utils;
