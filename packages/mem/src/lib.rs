//! In-memory reactive tabular store.
//!
//! [`MemStore`] keeps tables and values in plain `BTreeMap`s and implements
//! the full [`tabstore_core::Store`] surface: reads, writes, transactions
//! with rollback, and change listeners. Writes outside an explicit
//! transaction run in an implicit single-write transaction, so listeners
//! always observe the net effect of a completed frame.
//!
//! ```
//! use tabstore_core::{ScalarUpdate, Store};
//! use tabstore_mem::MemStore;
//!
//! let mut store = MemStore::new();
//! store.set_cell("pets", "fido", "species", ScalarUpdate::Set("dog".into()));
//! assert!(store.has_row("pets", "fido"));
//! ```

mod dispatch;
mod store;
mod txn;

pub use store::MemStore;
