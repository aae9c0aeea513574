//! Raw store rows and their mapping into typed records.
//!
//! The backend returns loosely shaped JSON objects. Every entity in
//! [`crate::types`] is built from a row through [`FromRow`], which reads
//! columns through the helpers below: missing or null columns default,
//! numeric ids are stringified, and numeric columns accept either JSON
//! numbers or numeric strings.

use serde_json::{Map, Value};

use super::Table;

/// A single row as returned by the data store.
pub type Row = Map<String, Value>;

/// Explicit mapping from a store row to a typed record.
pub trait FromRow: Sized {
    /// Table the record lives in.
    const TABLE: Table;

    /// Build the record, or `None` when the row lacks an identity.
    fn from_row(row: &Row) -> Option<Self>;
}

/// Map every row, skipping (and logging) rows that cannot be identified.
pub fn map_rows<T: FromRow>(rows: &[Row]) -> Vec<T> {
    rows.iter()
        .filter_map(|row| {
            let record = T::from_row(row);
            if record.is_none() {
                tracing::debug!("skipping {} row without an id", T::TABLE);
            }
            record
        })
        .collect()
}

/// Read an identifier column. Strings must be non-empty; numbers are stringified.
pub fn id(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a text column, defaulting to an empty string.
pub fn text(row: &Row, column: &str) -> String {
    opt_text(row, column).unwrap_or_default()
}

/// Read a text column, treating null, missing and blank values as absent.
pub fn opt_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a numeric column that may be stored as a number or a numeric string.
pub fn number(row: &Row, column: &str) -> Option<f64> {
    match row.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Read a non-negative integer column.
pub fn count(row: &Row, column: &str) -> Option<u32> {
    let value = number(row, column)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

/// Read a calendar year column.
pub fn year(row: &Row, column: &str) -> Option<i32> {
    let value = number(row, column)?;
    if value.fract() != 0.0 || value.abs() > 9999.0 {
        return None;
    }
    Some(value as i32)
}
