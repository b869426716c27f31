/// Binding and Retrieval Types
///
/// Values that can be bound to statement parameters, the storage classes a
/// column can report, and the translation between the zero-based indices
/// used by this crate and SQLite's one-based parameter numbering.
use rusqlite::ffi;
use std::ffi::c_int;

/// A value bound to a statement parameter.
///
/// Text and blobs are borrowed only for the duration of the bind call; the
/// engine takes its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindValue<'a> {
    Int(i32),
    Int64(i64),
    Double(f64),
    Text(&'a str),
    Blob(&'a [u8]),
    Null,
}

impl From<i32> for BindValue<'_> {
    fn from(value: i32) -> Self {
        BindValue::Int(value)
    }
}

impl From<i64> for BindValue<'_> {
    fn from(value: i64) -> Self {
        BindValue::Int64(value)
    }
}

impl From<f64> for BindValue<'_> {
    fn from(value: f64) -> Self {
        BindValue::Double(value)
    }
}

impl<'a> From<&'a str> for BindValue<'a> {
    fn from(value: &'a str) -> Self {
        BindValue::Text(value)
    }
}

impl<'a> From<&'a String> for BindValue<'a> {
    fn from(value: &'a String) -> Self {
        BindValue::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for BindValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        BindValue::Blob(value)
    }
}

impl<'a> From<&'a Vec<u8>> for BindValue<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        BindValue::Blob(value.as_slice())
    }
}

impl<'a, T: Into<BindValue<'a>>> From<Option<T>> for BindValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(BindValue::Null, Into::into)
    }
}

/// Storage class of a column value in the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

impl ColumnType {
    pub(crate) fn from_raw(raw: c_int) -> Self {
        match raw {
            ffi::SQLITE_INTEGER => ColumnType::Integer,
            ffi::SQLITE_FLOAT => ColumnType::Float,
            ffi::SQLITE_TEXT => ColumnType::Text,
            ffi::SQLITE_BLOB => ColumnType::Blob,
            _ => ColumnType::Null,
        }
    }
}

/// Maps a zero-based parameter index to SQLite's one-based numbering.
///
/// Returns `None` when the index cannot be represented natively.
pub(crate) fn parameter_index(index: usize) -> Option<c_int> {
    c_int::try_from(index).ok()?.checked_add(1)
}

/// Column indices are zero-based on both sides. Unrepresentable indices
/// saturate, which the engine treats as out of range (reads as NULL).
pub(crate) fn column_index(index: usize) -> c_int {
    c_int::try_from(index).unwrap_or(c_int::MAX)
}
