/// Native Handle Ownership
///
/// RAII owners for the two raw SQLite handles, plus the small helpers needed
/// to move text across the C boundary. Each owner releases its handle exactly
/// once, in `Drop`, so every exit path (including `?` and panics) cleans up.
use crate::core::{SqlError, SqlResult};
use rusqlite::ffi;
use std::ffi::{c_char, c_int, CStr, CString};
use std::ptr::{self, NonNull};
use tracing::{debug, warn};

/// Exclusive owner of an open `sqlite3*` session.
#[derive(Debug)]
pub(crate) struct DbHandle(NonNull<ffi::sqlite3>);

impl DbHandle {
    /// Opens a session with `sqlite3_open_v2`.
    ///
    /// The engine may hand back a handle even when it reports failure; that
    /// handle is owned from the moment it is returned and released when the
    /// error is propagated.
    pub(crate) fn open(path: &str, flags: c_int) -> SqlResult<DbHandle> {
        let c_path = to_cstring(path, "database path")?;
        let mut raw: *mut ffi::sqlite3 = ptr::null_mut();

        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut raw, flags, ptr::null()) };
        let handle = NonNull::new(raw).map(DbHandle);

        if rc != ffi::SQLITE_OK {
            let message = match &handle {
                Some(handle) => handle.last_error_message(),
                None => error_string(rc),
            };
            return Err(SqlError::new(rc, message));
        }

        let handle = handle.ok_or_else(|| {
            SqlError::new(ffi::SQLITE_NOMEM, error_string(ffi::SQLITE_NOMEM))
        })?;
        debug!("Opened database {:?}", path);
        Ok(handle)
    }

    pub(crate) fn as_ptr(&self) -> *mut ffi::sqlite3 {
        self.0.as_ptr()
    }

    /// Runs SQL text to completion with `sqlite3_exec`.
    pub(crate) fn exec(&self, sql: &str) -> SqlResult<()> {
        let c_sql = to_cstring(sql, "SQL text")?;
        let rc = unsafe {
            ffi::sqlite3_exec(
                self.as_ptr(),
                c_sql.as_ptr(),
                None,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if rc != ffi::SQLITE_OK {
            return Err(SqlError::new(rc, self.last_error_message()));
        }
        Ok(())
    }

    pub(crate) fn last_error_message(&self) -> String {
        unsafe { string_from_ptr(ffi::sqlite3_errmsg(self.as_ptr())) }
    }
}

impl Drop for DbHandle {
    fn drop(&mut self) {
        let rc = unsafe { ffi::sqlite3_close(self.as_ptr()) };
        if rc == ffi::SQLITE_OK {
            debug!("Closed database handle");
        } else {
            warn!("sqlite3_close returned {}: {}", rc, error_string(rc));
        }
    }
}

/// Exclusive owner of a compiled `sqlite3_stmt*`.
#[derive(Debug)]
pub(crate) struct StmtHandle(NonNull<ffi::sqlite3_stmt>);

impl StmtHandle {
    /// Compiles the first statement of `sql` against `db`.
    ///
    /// On failure the message is read from the session, which is where the
    /// engine records preparation errors. Text holding no statement at all
    /// (empty, whitespace, comments) is reported as misuse.
    pub(crate) fn prepare(db: &DbHandle, sql: &str) -> SqlResult<StmtHandle> {
        let len = c_int::try_from(sql.len()).map_err(|_| {
            SqlError::new(ffi::SQLITE_TOOBIG, error_string(ffi::SQLITE_TOOBIG))
        })?;
        let mut raw: *mut ffi::sqlite3_stmt = ptr::null_mut();

        let rc = unsafe {
            ffi::sqlite3_prepare_v2(
                db.as_ptr(),
                sql.as_ptr() as *const c_char,
                len,
                &mut raw,
                ptr::null_mut(),
            )
        };
        let handle = NonNull::new(raw).map(StmtHandle);

        if rc != ffi::SQLITE_OK {
            return Err(SqlError::new(rc, db.last_error_message()));
        }

        let handle = handle.ok_or_else(|| {
            SqlError::new(ffi::SQLITE_MISUSE, "SQL text contains no statement")
        })?;
        debug!("Prepared statement {:?}", sql);
        Ok(handle)
    }

    pub(crate) fn as_ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.0.as_ptr()
    }
}

impl Drop for StmtHandle {
    fn drop(&mut self) {
        // sqlite3_finalize echoes the last step error, which was already reported.
        let rc = unsafe { ffi::sqlite3_finalize(self.as_ptr()) };
        debug!("Finalized statement handle (rc = {})", rc);
    }
}

/// Static English text for a result code.
pub(crate) fn error_string(code: c_int) -> String {
    unsafe { string_from_ptr(ffi::sqlite3_errstr(code)) }
}

/// Copies a NUL-terminated engine string; a null pointer reads as empty.
///
/// # Safety
///
/// `ptr` must be null or point to a valid NUL-terminated string.
pub(crate) unsafe fn string_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

fn to_cstring(text: &str, what: &str) -> SqlResult<CString> {
    CString::new(text).map_err(|_| {
        SqlError::new(
            ffi::SQLITE_MISUSE,
            format!("{} contains an interior NUL byte", what),
        )
    })
}
