/// Database Module
///
/// This module provides the owned SQLite handles for litehandle,
/// organized into focused submodules.
///
/// ## Architecture
///
/// - **Handles** (`handle.rs`): RAII owners of the raw session and statement pointers
/// - **Connection Management** (`connection.rs`): Opening, closing, direct execution and transactions
/// - **Prepared Statements** (`statement.rs`): Binding, stepping, resetting and column reads
/// - **Values** (`value.rs`): Bindable values, column storage classes and index translation
///
/// ## Error Handling
///
/// Every engine failure is returned as a `SqlError`. Using a closed connection
/// or an unprepared statement is a programming error and panics instead.
mod handle;

pub mod connection;
pub mod statement;
pub mod value;

pub use connection::*;
pub use statement::*;
pub use value::*;
