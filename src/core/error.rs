/// Litehandle Error Module
///
/// This module defines the error types for litehandle. Every failing call into
/// the SQLite engine is surfaced as a single [`SqlError`] carrying the engine's
/// status code and the diagnostic message read at the moment of failure.
/// Configuration loading and I/O failures are wrapped by [`LiteError`].
use thiserror::Error;

/// A failure reported by the SQLite engine.
///
/// The message is captured immediately after the failing call, because the
/// engine's diagnostic state is per-connection and gets overwritten by the
/// next call on that connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("SQLite error {code}: {message}")]
pub struct SqlError {
    /// Status code returned by the engine (possibly an extended code)
    pub code: i32,
    /// Diagnostic text captured at failure time
    pub message: String,
}

impl SqlError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        SqlError {
            code,
            message: message.into(),
        }
    }

    /// The primary result code, with any extended-code bits masked off.
    pub fn primary_code(&self) -> i32 {
        self.code & 0xff
    }

    /// True for UNIQUE, NOT NULL, CHECK and foreign key violations.
    pub fn is_constraint_violation(&self) -> bool {
        self.primary_code() == rusqlite::ffi::SQLITE_CONSTRAINT
    }
}

/// Crate-wide error type.
///
/// Core database operations only ever fail with [`LiteError::Sql`]; the other
/// variants come from loading configuration and from the command-line tool.
#[derive(Error, Debug)]
pub enum LiteError {
    /// Errors reported by the SQLite engine
    #[error("Database error: {0}")]
    Sql(#[from] SqlError),

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors while reading a configuration file
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result of a core database operation.
pub type SqlResult<T> = std::result::Result<T, SqlError>;

/// Type alias for Result to use LiteError as the error type.
pub type Result<T> = std::result::Result<T, LiteError>;
