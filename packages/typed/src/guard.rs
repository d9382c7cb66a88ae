//! The storage scalar guard.
//!
//! Field codecs are opaque function pairs, so storage safety cannot be
//! checked statically. Every encoded value passes through here immediately
//! before it would reach the underlying store.

use tabstore_core::Scalar;

use crate::error::Error;
use crate::value::Value;

/// Validate that an encoded value is storage-safe and convert it to a
/// [`Scalar`].
///
/// Only strings, numbers, booleans and null may be stored; anything else
/// fails with [`Error::StorageType`] naming the offending field's dotted
/// path. The path is built lazily since the happy path never needs it.
pub fn to_storage_scalar(
    value: &Value,
    path: impl FnOnce() -> String,
) -> Result<Scalar, Error> {
    match value {
        Value::Null => Ok(Scalar::Null),
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::Int(i) => Ok(Scalar::Number(*i as f64)),
        Value::Float(f) => Ok(Scalar::Number(*f)),
        Value::String(s) => Ok(Scalar::String(s.clone())),
        other => Err(Error::StorageType {
            path: path(),
            type_name: other.type_name(),
        }),
    }
}

/// Dotted path for a cell: `tables.<table>.<row>.<cell>`.
pub(crate) fn cell_path(table_id: &str, row_id: &str, cell_id: &str) -> String {
    format!("tables.{table_id}.{row_id}.{cell_id}")
}

/// Dotted path for a global value: `values.<value>`.
pub(crate) fn value_path(value_id: &str) -> String {
    format!("values.{value_id}")
}
