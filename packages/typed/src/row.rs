//! Structural encode/decode over rows, tables, and table sets.
//!
//! Encode paths use strict schema lookups and run the scalar guard on every
//! field; decode paths are lenient, skipping anything the schema does not
//! declare. Field-codec errors propagate unwrapped in both directions.

use std::sync::Arc;

use tabstore_core::{Row, Scalar, Table, Tables};

use crate::error::Error;
use crate::guard::{cell_path, to_storage_scalar};
use crate::schema::{FieldCodec, Schema, Shape};
use crate::value::{AppRow, AppTable, AppTables, Value};

/// Encode one field and guard the result. `None` means absence: the entry
/// is dropped or deleted rather than written.
pub(crate) fn encode_field(
    codec: &Arc<dyn FieldCodec>,
    value: &Value,
    path: impl FnOnce() -> String,
) -> Result<Option<Scalar>, Error> {
    match codec.encode(value)? {
        Some(encoded) => Ok(Some(to_storage_scalar(&encoded, path)?)),
        None => Ok(None),
    }
}

/// Encode a full application row into storage scalars.
///
/// Every cell id in the input must be declared in the table's row shape.
/// Fields that encode to absence are dropped from the result.
pub(crate) fn encode_row(
    schema: &Schema,
    table_id: &str,
    row_id: &str,
    row: &AppRow,
) -> Result<Row, Error> {
    let shape = schema.require_row_shape(table_id)?;
    let mut encoded = Row::new();
    for (cell_id, value) in row {
        let codec = shape.codec(cell_id).ok_or_else(|| Error::UnknownCell {
            table_id: table_id.to_string(),
            cell_id: cell_id.clone(),
        })?;
        if let Some(scalar) = encode_field(codec, value, || cell_path(table_id, row_id, cell_id))? {
            encoded.insert(cell_id.clone(), scalar);
        }
    }
    Ok(encoded)
}

/// Decode a storage row against a row shape.
///
/// An empty row decodes to `None`, the caller's observable "row does not
/// exist". Cells the shape does not declare are skipped.
pub(crate) fn decode_row(shape: &Shape, row: &Row) -> Result<Option<AppRow>, Error> {
    if row.is_empty() {
        return Ok(None);
    }
    let mut decoded = AppRow::new();
    for (cell_id, scalar) in row {
        if let Some(codec) = shape.codec(cell_id) {
            decoded.insert(cell_id.clone(), codec.decode(scalar)?);
        }
    }
    if decoded.is_empty() {
        return Ok(None);
    }
    Ok(Some(decoded))
}

/// Encode a whole application table, row by row.
pub(crate) fn encode_table(
    schema: &Schema,
    table_id: &str,
    table: &AppTable,
) -> Result<Table, Error> {
    // The strict table lookup fires even for an empty input table.
    schema.require_row_shape(table_id)?;
    let mut encoded = Table::new();
    for (row_id, row) in table {
        encoded.insert(row_id.clone(), encode_row(schema, table_id, row_id, row)?);
    }
    Ok(encoded)
}

/// Decode a whole storage table. Rows that decode to nothing are omitted.
pub(crate) fn decode_table(shape: &Shape, table: &Table) -> Result<AppTable, Error> {
    let mut decoded = AppTable::new();
    for (row_id, row) in table {
        if let Some(app_row) = decode_row(shape, row)? {
            decoded.insert(row_id.clone(), app_row);
        }
    }
    Ok(decoded)
}

/// Encode a full table set, silently skipping undeclared table ids.
pub(crate) fn encode_tables(schema: &Schema, tables: &AppTables) -> Result<Tables, Error> {
    let mut encoded = Tables::new();
    for (table_id, table) in tables {
        if schema.has_table(table_id) {
            encoded.insert(table_id.clone(), encode_table(schema, table_id, table)?);
        }
    }
    Ok(encoded)
}

/// Decode a full storage table set, silently skipping undeclared table ids.
pub(crate) fn decode_tables(schema: &Schema, tables: &Tables) -> Result<AppTables, Error> {
    let mut decoded = AppTables::new();
    for (table_id, table) in tables {
        if let Some(shape) = schema.row_shape(table_id) {
            decoded.insert(table_id.clone(), decode_table(shape, table)?);
        }
    }
    Ok(decoded)
}
