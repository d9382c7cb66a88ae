//! Typed encode/decode facade for tabstore.
//!
//! The underlying [`Store`](tabstore_core::Store) only ever holds scalars:
//! strings, numbers, booleans and null. This crate puts a schema in front
//! of it so application code works with richer values — structured maps,
//! dates, big integers — while every byte that reaches storage stays a
//! scalar:
//!
//! - a [`Schema`] declares, per table cell and per global value, a
//!   [`FieldCodec`]: a bidirectional transform between the application type
//!   and a storage-safe one;
//! - writes encode through the declared codec and pass a scalar guard, so
//!   a codec that produces something non-storable fails the write with
//!   [`Error::StorageType`] before the store sees it;
//! - reads decode, including values delivered through listener callbacks
//!   and change-lookup closures;
//! - encoding to absence deletes the entry rather than writing a sentinel.
//!
//! Transactions, identifiers, and existence queries delegate straight to
//! the wrapped store, so its batching, rollback, and mutator-ordering
//! behavior apply unchanged.
//!
//! # Example
//!
//! ```rust
//! use tabstore_mem::MemStore;
//! use tabstore_typed::{JsonCodec, PlainCodec, Schema, Shape, TypedStore, Value};
//!
//! let schema = Schema::new().table(
//!     "users",
//!     Shape::new().field("name", PlainCodec).field("prefs", JsonCodec),
//! );
//! let mut store = TypedStore::new(MemStore::new(), schema);
//!
//! let prefs = Value::Map([("theme".to_string(), Value::from("dark"))].into_iter().collect());
//! store.set_row(
//!     "users",
//!     "u1",
//!     [
//!         ("name".to_string(), Value::from("Alice")),
//!         ("prefs".to_string(), prefs.clone()),
//!     ]
//!     .into_iter()
//!     .collect(),
//! )?;
//!
//! // Stored as JSON text, read back decoded.
//! assert_eq!(store.get_cell("users", "u1", "prefs")?, Some(prefs));
//! # Ok::<(), tabstore_typed::Error>(())
//! ```

mod codecs;
mod error;
mod guard;
mod listeners;
mod readonly;
mod row;
mod schema;
mod typed;
mod value;

pub use codecs::{BigIntCodec, IsoDateCodec, JsonCodec, MillisDateCodec, PlainCodec, SecsDateCodec};
pub use error::Error;
pub use guard::to_storage_scalar;
pub use listeners::{CellLookup, ValueLookup};
pub use readonly::ReadOnly;
pub use schema::{FieldCodec, Schema, Shape};
pub use typed::{TypedRef, TypedStore, Update};
pub use value::{
    json_to_value, value_to_json, AppRow, AppTable, AppTables, AppValues, Value,
};
