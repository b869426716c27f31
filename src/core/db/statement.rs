/// Prepared Statement Module
///
/// This module provides [`Statement`], the exclusive owner of one compiled
/// SQLite statement. It handles parameter binding, stepping through result
/// rows, resetting for reuse, and typed column reads.
///
/// ## Indexing
///
/// Both parameter and column indices are zero-based. Parameters are shifted to
/// SQLite's one-based numbering at the binding boundary.
///
/// ## Lifecycle
///
/// `Unprepared -> Prepared -> (HasRow | Done)* -> Prepared (after reset)`.
/// The compiled handle is finalized exactly once, when the statement is
/// re-prepared or dropped.
use super::connection::Connection;
use super::handle::{error_string, string_from_ptr, StmtHandle};
use super::value::{column_index, parameter_index, BindValue, ColumnType};
use crate::core::{SqlError, SqlResult};
use rusqlite::ffi;
use std::ffi::{c_char, c_int, c_void};
use std::slice;
use tracing::trace;

/// A compiled statement borrowed from the [`Connection`] it was prepared on.
///
/// The borrow guarantees the connection outlives the statement. The connection
/// is only consulted for diagnostic messages; the statement never owns it.
///
/// Binding, stepping and reading columns on an unprepared statement panics.
#[derive(Debug, Default)]
pub struct Statement<'conn> {
    handle: Option<StmtHandle>,
    connection: Option<&'conn Connection>,
}

impl<'conn> Statement<'conn> {
    /// Creates an unprepared statement.
    pub fn new() -> Self {
        Statement {
            handle: None,
            connection: None,
        }
    }

    /// Compiles the first statement in `sql` against `connection`.
    ///
    /// On success any previously compiled statement is finalized and replaced.
    /// On failure nothing is retained from the attempt and the error carries
    /// the connection's diagnostic message.
    ///
    /// # Panics
    ///
    /// Panics if `connection` is not open.
    pub fn prepare(&mut self, connection: &'conn Connection, sql: &str) -> SqlResult<()> {
        let handle = StmtHandle::prepare(connection.handle(), sql)?;
        self.handle = Some(handle);
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.handle.is_some()
    }

    /// Binds `value` to the parameter at zero-based `index`.
    ///
    /// ```
    /// use litehandle::Connection;
    ///
    /// let mut conn = Connection::new();
    /// conn.create_in_memory()?;
    /// let mut stmt = conn.prepare("SELECT ? || ?")?;
    /// stmt.bind(0, "left-")?;
    /// stmt.bind(1, "right")?;
    /// assert!(stmt.step()?);
    /// assert_eq!(stmt.get_string(0), "left-right");
    /// # Ok::<_, litehandle::SqlError>(())
    /// ```
    pub fn bind<'v>(&mut self, index: usize, value: impl Into<BindValue<'v>>) -> SqlResult<()> {
        let stmt = self.raw();
        let Some(native) = parameter_index(index) else {
            return Err(SqlError::new(ffi::SQLITE_RANGE, error_string(ffi::SQLITE_RANGE)));
        };

        let rc = match value.into() {
            BindValue::Int(v) => unsafe { ffi::sqlite3_bind_int(stmt, native, v) },
            BindValue::Int64(v) => unsafe { ffi::sqlite3_bind_int64(stmt, native, v) },
            BindValue::Double(v) => unsafe { ffi::sqlite3_bind_double(stmt, native, v) },
            BindValue::Text(v) => {
                let len = length(v.len())?;
                unsafe {
                    ffi::sqlite3_bind_text(
                        stmt,
                        native,
                        v.as_ptr() as *const c_char,
                        len,
                        ffi::SQLITE_TRANSIENT(),
                    )
                }
            }
            BindValue::Blob(v) => {
                let len = length(v.len())?;
                unsafe {
                    ffi::sqlite3_bind_blob(
                        stmt,
                        native,
                        v.as_ptr() as *const c_void,
                        len,
                        ffi::SQLITE_TRANSIENT(),
                    )
                }
            }
            BindValue::Null => unsafe { ffi::sqlite3_bind_null(stmt, native) },
        };
        self.check(rc)
    }

    pub fn bind_null(&mut self, index: usize) -> SqlResult<()> {
        self.bind(index, BindValue::Null)
    }

    /// Resets every parameter to NULL.
    pub fn clear_bindings(&mut self) -> SqlResult<()> {
        let rc = unsafe { ffi::sqlite3_clear_bindings(self.raw()) };
        self.check(rc)
    }

    /// Advances to the next row.
    ///
    /// Returns `true` when a row is available for the column getters and
    /// `false` once execution has completed.
    pub fn step(&mut self) -> SqlResult<bool> {
        let rc = unsafe { ffi::sqlite3_step(self.raw()) };
        trace!("step returned {}", rc);
        match rc {
            ffi::SQLITE_ROW => Ok(true),
            ffi::SQLITE_DONE => Ok(false),
            _ => Err(self.error(rc)),
        }
    }

    /// Returns the statement to its pre-execution state, keeping bindings.
    ///
    /// Resetting an unprepared statement does nothing.
    pub fn reset(&mut self) -> SqlResult<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        let rc = unsafe { ffi::sqlite3_reset(handle.as_ptr()) };
        trace!("reset returned {}", rc);
        self.check(rc)
    }

    pub fn parameter_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_bind_parameter_count(self.raw()) };
        usize::try_from(count).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_column_count(self.raw()) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Name of the result column, or `None` if out of range.
    pub fn column_name(&self, column: usize) -> Option<String> {
        let name = unsafe { ffi::sqlite3_column_name(self.raw(), column_index(column)) };
        if name.is_null() {
            return None;
        }
        Some(unsafe { string_from_ptr(name) })
    }

    /// The SQL text this statement was compiled from.
    pub fn sql(&self) -> Option<String> {
        let handle = self.handle.as_ref()?;
        Some(unsafe { string_from_ptr(ffi::sqlite3_sql(handle.as_ptr())) })
    }

    pub fn column_type(&self, column: usize) -> ColumnType {
        ColumnType::from_raw(unsafe { ffi::sqlite3_column_type(self.raw(), column_index(column)) })
    }

    pub fn is_null(&self, column: usize) -> bool {
        self.column_type(column) == ColumnType::Null
    }

    pub fn get_int(&self, column: usize) -> i32 {
        unsafe { ffi::sqlite3_column_int(self.raw(), column_index(column)) }
    }

    pub fn get_int64(&self, column: usize) -> i64 {
        unsafe { ffi::sqlite3_column_int64(self.raw(), column_index(column)) }
    }

    pub fn get_double(&self, column: usize) -> f64 {
        unsafe { ffi::sqlite3_column_double(self.raw(), column_index(column)) }
    }

    /// Reads the column as text. A NULL value reads as an empty string.
    ///
    /// Use [`get_optional_string`](Statement::get_optional_string) to tell
    /// NULL apart from an empty string.
    pub fn get_string(&self, column: usize) -> String {
        let stmt = self.raw();
        let column = column_index(column);

        // The text pointer must be fetched first; the byte count then describes it.
        let text = unsafe { ffi::sqlite3_column_text(stmt, column) };
        if text.is_null() {
            return String::new();
        }
        let len = unsafe { ffi::sqlite3_column_bytes(stmt, column) };
        let bytes = unsafe { slice::from_raw_parts(text, usize::try_from(len).unwrap_or(0)) };
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Reads the column as raw bytes. A NULL value reads as an empty vector.
    pub fn get_blob(&self, column: usize) -> Vec<u8> {
        let stmt = self.raw();
        let column = column_index(column);

        let len = unsafe { ffi::sqlite3_column_bytes(stmt, column) };
        let data = unsafe { ffi::sqlite3_column_blob(stmt, column) };
        if data.is_null() {
            return Vec::new();
        }
        let len = usize::try_from(len).unwrap_or(0);
        unsafe { slice::from_raw_parts(data as *const u8, len) }.to_vec()
    }

    pub fn get_optional_string(&self, column: usize) -> Option<String> {
        if self.is_null(column) {
            return None;
        }
        Some(self.get_string(column))
    }

    pub fn get_optional_blob(&self, column: usize) -> Option<Vec<u8>> {
        if self.is_null(column) {
            return None;
        }
        Some(self.get_blob(column))
    }

    fn raw(&self) -> *mut ffi::sqlite3_stmt {
        match &self.handle {
            Some(handle) => handle.as_ptr(),
            None => panic!("statement is not prepared"),
        }
    }

    fn check(&self, rc: c_int) -> SqlResult<()> {
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(self.error(rc))
        }
    }

    /// Captures the owning session's diagnostic message for `rc`.
    fn error(&self, rc: c_int) -> SqlError {
        let message = match self.connection {
            Some(connection) => connection.last_error_message(),
            None => error_string(rc),
        };
        SqlError::new(rc, message)
    }
}

fn length(len: usize) -> SqlResult<c_int> {
    c_int::try_from(len)
        .map_err(|_| SqlError::new(ffi::SQLITE_TOOBIG, error_string(ffi::SQLITE_TOOBIG)))
}
