//! Listener callback types.
//!
//! Every callback receives the store first, so a listener can issue further
//! reads and (for mutator listeners) writes in response to the change it
//! observes. Cell and value listeners additionally receive the new/old pair
//! and a change-lookup closure that re-derives the pair for any id.

use crate::{IdChanges, Scalar, Store};

/// An opaque handle to a registered listener.
pub type ListenerId = u64;

/// Re-derives `(changed, old, new)` for an arbitrary (table, row, cell) id.
///
/// Carries a lifetime so dispatchers can hand listeners a closure that
/// borrows their in-flight change set.
pub type CellChangeLookup<'a> =
    dyn Fn(&str, &str, &str) -> (bool, Option<Scalar>, Option<Scalar>) + 'a;

/// Re-derives `(changed, old, new)` for an arbitrary value id.
pub type ValueChangeLookup<'a> = dyn Fn(&str) -> (bool, Option<Scalar>, Option<Scalar>) + 'a;

/// Fires when any tabular data changed.
pub type TablesListener = Box<dyn FnMut(&mut dyn Store, &CellChangeLookup<'_>)>;

/// Fires when the set of table ids changed.
pub type TableIdsListener = Box<dyn FnMut(&mut dyn Store, &IdChanges)>;

/// Fires per changed table: `(store, table_id, lookup)`.
pub type TableListener = Box<dyn FnMut(&mut dyn Store, &str, &CellChangeLookup<'_>)>;

/// Fires when a table's set of row ids changed: `(store, table_id, changes)`.
pub type RowIdsListener = Box<dyn FnMut(&mut dyn Store, &str, &IdChanges)>;

/// Fires when a sorted-row-id query's result changed: `(store, table_id, ids)`.
pub type SortedRowIdsListener = Box<dyn FnMut(&mut dyn Store, &str, &[String])>;

/// Fires per changed row: `(store, table_id, row_id, lookup)`.
pub type RowListener = Box<dyn FnMut(&mut dyn Store, &str, &str, &CellChangeLookup<'_>)>;

/// Fires when a row's set of cell ids changed: `(store, table_id, row_id, changes)`.
pub type CellIdsListener = Box<dyn FnMut(&mut dyn Store, &str, &str, &IdChanges)>;

/// Fires per changed cell: `(store, table_id, row_id, cell_id, new, old, lookup)`.
pub type CellListener = Box<
    dyn FnMut(
        &mut dyn Store,
        &str,
        &str,
        &str,
        Option<&Scalar>,
        Option<&Scalar>,
        &CellChangeLookup<'_>,
    ),
>;

/// Fires when any value changed.
pub type ValuesListener = Box<dyn FnMut(&mut dyn Store, &ValueChangeLookup<'_>)>;

/// Fires when the set of value ids changed.
pub type ValueIdsListener = Box<dyn FnMut(&mut dyn Store, &IdChanges)>;

/// Fires per changed value: `(store, value_id, new, old, lookup)`.
pub type ValueListener =
    Box<dyn FnMut(&mut dyn Store, &str, Option<&Scalar>, Option<&Scalar>, &ValueChangeLookup<'_>)>;

/// Fires when whole-store existence flips (any tables at all / any values at all).
pub type HasListener = Box<dyn FnMut(&mut dyn Store, bool)>;

/// Fires when a table's existence flips: `(store, table_id, has)`.
pub type HasTableListener = Box<dyn FnMut(&mut dyn Store, &str, bool)>;

/// Fires when a row's existence flips: `(store, table_id, row_id, has)`.
pub type HasRowListener = Box<dyn FnMut(&mut dyn Store, &str, &str, bool)>;

/// Fires when a cell's existence flips: `(store, table_id, row_id, cell_id, has)`.
pub type HasCellListener = Box<dyn FnMut(&mut dyn Store, &str, &str, &str, bool)>;

/// Fires when a value's existence flips: `(store, value_id, has)`.
pub type HasValueListener = Box<dyn FnMut(&mut dyn Store, &str, bool)>;
