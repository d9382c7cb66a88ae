//! Error types for the typed facade.

use thiserror::Error;

/// Errors raised by typed reads, writes, and the storage scalar guard.
///
/// Strict schema lookups raise the `Unknown*` variants; they are used on
/// single-entity paths, where silently ignoring an undeclared id would hide
/// a programming mistake. Bulk collection paths and decode-on-read filter
/// undeclared ids out instead of raising.
#[derive(Debug, Error)]
pub enum Error {
    /// A single-table operation targeted a table id the schema does not
    /// declare.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A single-cell operation targeted a cell id the table's row shape does
    /// not declare.
    #[error("unknown cell {cell_id} in table {table_id}")]
    UnknownCell { table_id: String, cell_id: String },

    /// A strict value lookup targeted a value id the schema does not declare.
    #[error("unknown value: {0}")]
    UnknownValue(String),

    /// A cell write targeted a row that does not exist. Rows are created by
    /// full-row writes only, so a lone cell can never bring one into being.
    #[error("row {row_id} does not exist in table {table_id}")]
    MissingRow { table_id: String, row_id: String },

    /// An encode step produced a value that cannot live in storage.
    #[error(
        "invalid encoded value for storage at {path}: expected string, \
         number, boolean or null (or absence to delete), got {type_name}"
    )]
    StorageType {
        /// Dotted path of the offending field, e.g. `tables.users.u1.prefs`.
        path: String,
        type_name: &'static str,
    },

    /// A caller-supplied field codec failed in its own encode or decode
    /// step. The message is the codec's, passed through unaltered.
    #[error("{0}")]
    Codec(String),
}

impl Error {
    /// Shorthand for codec-level failures.
    pub fn codec(message: impl Into<String>) -> Self {
        Error::Codec(message.into())
    }
}
