/// Connection Management Module
///
/// This module provides the [`Connection`] type, the exclusive owner of one
/// SQLite session handle, along with direct execution of unparameterized SQL
/// and the transaction boundary commands.
use super::handle::DbHandle;
use super::statement::Statement;
use crate::config::ConnectionConfig;
use crate::core::{SqlError, SqlResult};
use rusqlite::ffi;
use std::ffi::c_int;
use std::ptr;
use tracing::debug;

/// Location that designates a transient in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// An owned SQLite session.
///
/// A `Connection` starts out closed. [`open`](Connection::open) populates it,
/// and the handle is released exactly once, either by [`close`](Connection::close)
/// or when the value is dropped.
///
/// Statements borrow the connection they were prepared against, so the
/// connection cannot be closed, reopened or dropped while any of them is alive.
/// Operations that need an open session panic if the connection is closed;
/// that is a caller bug, not a runtime condition.
#[derive(Debug, Default)]
pub struct Connection {
    handle: Option<DbHandle>,
}

// SAFETY: the bundled SQLite is compiled with SQLITE_THREADSAFE=1, so a
// session may move between threads. `Connection` is not `Sync`; callers that
// share one must serialize access themselves.
unsafe impl Send for Connection {}

impl Connection {
    /// Creates a closed connection.
    pub fn new() -> Self {
        Connection { handle: None }
    }

    /// Opens (or creates) the database at `path` for reading and writing.
    ///
    /// Any handle already held is released first. On failure the connection
    /// is left closed and the engine's status code and message are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use litehandle::Connection;
    ///
    /// let mut conn = Connection::new();
    /// conn.open(litehandle::IN_MEMORY)?;
    /// assert!(conn.is_open());
    /// # Ok::<_, litehandle::SqlError>(())
    /// ```
    pub fn open(&mut self, path: &str) -> SqlResult<()> {
        self.close();
        self.handle = Some(DbHandle::open(
            path,
            ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE,
        )?);
        Ok(())
    }

    /// Opens the database described by `config`, then applies its pragmas.
    ///
    /// If any post-open step fails, the freshly opened handle is released
    /// before the error is returned and the connection is left closed.
    pub fn open_with(&mut self, config: &ConnectionConfig) -> SqlResult<()> {
        self.close();

        let handle = DbHandle::open(&config.path, config.open_flags())?;
        if let Some(enabled) = config.foreign_keys {
            handle.exec(if enabled {
                "PRAGMA foreign_keys = ON"
            } else {
                "PRAGMA foreign_keys = OFF"
            })?;
        }
        if let Some(timeout_ms) = config.busy_timeout_ms {
            let timeout_ms = c_int::try_from(timeout_ms).unwrap_or(c_int::MAX);
            let rc = unsafe { ffi::sqlite3_busy_timeout(handle.as_ptr(), timeout_ms) };
            if rc != ffi::SQLITE_OK {
                return Err(SqlError::new(rc, handle.last_error_message()));
            }
        }

        self.handle = Some(handle);
        Ok(())
    }

    /// Opens a fresh, private in-memory database.
    pub fn create_in_memory(&mut self) -> SqlResult<()> {
        self.open(IN_MEMORY)
    }

    /// Releases the session handle. Does nothing if already closed.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!("Connection closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Runs one or more unparameterized statements to completion.
    ///
    /// # Panics
    ///
    /// Panics if the connection is not open.
    pub fn execute(&self, sql: &str) -> SqlResult<()> {
        self.handle().exec(sql)
    }

    /// Compiles `sql` into a statement bound to this connection.
    pub fn prepare(&self, sql: &str) -> SqlResult<Statement<'_>> {
        let mut statement = Statement::new();
        statement.prepare(self, sql)?;
        Ok(statement)
    }

    /// Row id assigned by the most recent successful insert on this session.
    pub fn last_inserted_row_id(&self) -> i64 {
        unsafe { ffi::sqlite3_last_insert_rowid(self.handle().as_ptr()) }
    }

    /// Number of rows modified by the most recently completed statement.
    pub fn changes(&self) -> u64 {
        let changes = unsafe { ffi::sqlite3_changes(self.handle().as_ptr()) };
        u64::try_from(changes).unwrap_or(0)
    }

    /// The session's current diagnostic message.
    ///
    /// Only meaningful right after a failing call; the next call on this
    /// session overwrites it.
    pub fn last_error_message(&self) -> String {
        self.handle().last_error_message()
    }

    /// Number of compiled statements the engine still holds for this session.
    pub fn live_statement_count(&self) -> usize {
        let db = self.handle().as_ptr();
        let mut count = 0;
        let mut stmt = unsafe { ffi::sqlite3_next_stmt(db, ptr::null_mut()) };
        while !stmt.is_null() {
            count += 1;
            stmt = unsafe { ffi::sqlite3_next_stmt(db, stmt) };
        }
        count
    }

    // Transaction boundaries carry no state here; nesting is the caller's concern.

    pub fn begin_transaction(&self) -> SqlResult<()> {
        self.execute("BEGIN")
    }

    pub fn commit_transaction(&self) -> SqlResult<()> {
        self.execute("COMMIT")
    }

    pub fn rollback_transaction(&self) -> SqlResult<()> {
        self.execute("ROLLBACK")
    }

    pub(crate) fn handle(&self) -> &DbHandle {
        match &self.handle {
            Some(handle) => handle,
            None => panic!("connection is not open"),
        }
    }
}
