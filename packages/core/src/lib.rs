//! Core tabstore: the shared vocabulary of the reactive tabular store.
//!
//! This layer defines what every other layer talks in terms of:
//! - `Scalar`: the only thing a store ever persists (string, number, boolean, null)
//! - Content aliases: `Row`, `Table`, `Tables`, `Values`
//! - `IdFilter`: a specific id or the match-all wildcard, for listener registration
//! - `Store`: the object-safe trait covering reads, writes, transactions and
//!   listener registration at every granularity
//!
//! Use this layer to write code that works against any store implementation:
//!
//! ```rust
//! use tabstore_core::{Scalar, Store};
//!
//! fn user_count(store: &dyn Store) -> usize {
//!     store.get_row_ids("users").len()
//! }
//! ```

mod content;
mod listener;
mod scalar;
mod store;

pub use content::{IdChanges, IdFilter, Row, SortedRowIdsArgs, Table, Tables, Values};
pub use listener::{
    CellChangeLookup, CellIdsListener, CellListener, HasCellListener, HasListener,
    HasRowListener, HasTableListener, HasValueListener, ListenerId, RowIdsListener, RowListener,
    SortedRowIdsListener, TableIdsListener, TableListener, TablesListener, ValueChangeLookup,
    ValueIdsListener, ValueListener, ValuesListener,
};
pub use scalar::Scalar;
pub use store::{ScalarUpdate, Store};
