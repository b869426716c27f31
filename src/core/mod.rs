/// Core Module for litehandle
///
/// This module contains the fundamental components of the crate: the owned
/// database handles and the error types shared by every operation.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{LiteError, Result, SqlError, SqlResult};
