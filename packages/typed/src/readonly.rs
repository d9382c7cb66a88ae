//! Read-only projection of the typed facade.
//!
//! [`ReadOnly`] exposes the decode-side operations and non-mutator listener
//! registration, and nothing else. This is a type-level restriction for API
//! ergonomics, not an access-control boundary: the writable facade remains
//! reachable through any reference that has it, and listener callbacks
//! still receive a write-capable typed view.

use tabstore_core::{IdFilter, ListenerId, SortedRowIdsArgs, Store};

use crate::error::Error;
use crate::listeners::{CellLookup, ValueLookup};
use crate::typed::{TypedRef, TypedStore};
use crate::value::{AppRow, AppTable, AppTables, AppValues, Value};

/// A borrow of a [`TypedStore`] narrowed to reads and non-mutator
/// listeners.
pub struct ReadOnly<'a, S: Store> {
    inner: &'a mut TypedStore<S>,
}

impl<S: Store> TypedStore<S> {
    /// Narrow this facade to its read-only surface.
    pub fn read_only(&mut self) -> ReadOnly<'_, S> {
        ReadOnly { inner: self }
    }
}

impl<S: Store> ReadOnly<'_, S> {
    pub fn get_tables(&self) -> Result<AppTables, Error> {
        self.inner.get_tables()
    }

    pub fn get_table(&self, table_id: &str) -> Result<AppTable, Error> {
        self.inner.get_table(table_id)
    }

    pub fn get_row(&self, table_id: &str, row_id: &str) -> Result<Option<AppRow>, Error> {
        self.inner.get_row(table_id, row_id)
    }

    pub fn require_row(&self, table_id: &str, row_id: &str) -> Result<AppRow, Error> {
        self.inner.require_row(table_id, row_id)
    }

    pub fn get_cell(
        &self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
    ) -> Result<Option<Value>, Error> {
        self.inner.get_cell(table_id, row_id, cell_id)
    }

    pub fn get_values(&self) -> Result<AppValues, Error> {
        self.inner.get_values()
    }

    pub fn get_value(&self, value_id: &str) -> Result<Option<Value>, Error> {
        self.inner.get_value(value_id)
    }

    pub fn has_tables(&self) -> bool {
        self.inner.has_tables()
    }

    pub fn has_table(&self, table_id: &str) -> bool {
        self.inner.has_table(table_id)
    }

    pub fn has_row(&self, table_id: &str, row_id: &str) -> bool {
        self.inner.has_row(table_id, row_id)
    }

    pub fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool {
        self.inner.has_cell(table_id, row_id, cell_id)
    }

    pub fn has_values(&self) -> bool {
        self.inner.has_values()
    }

    pub fn has_value(&self, value_id: &str) -> bool {
        self.inner.has_value(value_id)
    }

    pub fn get_table_ids(&self) -> Vec<String> {
        self.inner.get_table_ids()
    }

    pub fn get_row_ids(&self, table_id: &str) -> Vec<String> {
        self.inner.get_row_ids(table_id)
    }

    pub fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String> {
        self.inner.get_cell_ids(table_id, row_id)
    }

    pub fn get_table_cell_ids(&self, table_id: &str) -> Vec<String> {
        self.inner.get_table_cell_ids(table_id)
    }

    pub fn get_value_ids(&self) -> Vec<String> {
        self.inner.get_value_ids()
    }

    pub fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String> {
        self.inner
            .get_sorted_row_ids(table_id, cell_id, descending, offset, limit)
    }

    pub fn get_sorted_row_ids_with(&self, args: &SortedRowIdsArgs) -> Vec<String> {
        self.inner.get_sorted_row_ids_with(args)
    }

    pub fn get_json(&self) -> String {
        self.inner.get_json()
    }

    // --- non-mutator listener registration ---

    pub fn add_tables_listener(
        &mut self,
        listener: impl FnMut(&mut TypedRef<'_>, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        self.inner.add_tables_listener(false, listener)
    }

    pub fn add_table_listener(
        &mut self,
        table: IdFilter,
        listener: impl FnMut(&mut TypedRef<'_>, &str, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        self.inner.add_table_listener(table, false, listener)
    }

    pub fn add_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        listener: impl FnMut(&mut TypedRef<'_>, &str, &str, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        self.inner.add_row_listener(table, row, false, listener)
    }

    #[allow(clippy::type_complexity)]
    pub fn add_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        listener: impl FnMut(
                &mut TypedRef<'_>,
                &str,
                &str,
                &str,
                Option<&Value>,
                Option<&Value>,
                &CellLookup<'_>,
            ) + 'static,
    ) -> ListenerId {
        self.inner.add_cell_listener(table, row, cell, false, listener)
    }

    pub fn add_values_listener(
        &mut self,
        listener: impl FnMut(&mut TypedRef<'_>, &ValueLookup<'_>) + 'static,
    ) -> ListenerId {
        self.inner.add_values_listener(false, listener)
    }

    pub fn add_value_listener(
        &mut self,
        value: IdFilter,
        listener: impl FnMut(&mut TypedRef<'_>, &str, Option<&Value>, Option<&Value>, &ValueLookup<'_>)
            + 'static,
    ) -> ListenerId {
        self.inner.add_value_listener(value, false, listener)
    }

    pub fn del_listener(&mut self, listener_id: ListenerId) {
        self.inner.del_listener(listener_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::PlainCodec;
    use crate::schema::{Schema, Shape};
    use tabstore_mem::MemStore;

    #[test]
    fn read_only_view_reads_decoded_data() {
        let mut ts = TypedStore::new(
            MemStore::new(),
            Schema::new().table("t", Shape::new().field("c", PlainCodec)),
        );
        ts.set_row(
            "t",
            "r",
            [("c".to_string(), Value::from("x"))].into_iter().collect(),
        )
        .unwrap();

        let ro = ts.read_only();
        assert!(ro.has_row("t", "r"));
        assert_eq!(ro.get_cell("t", "r", "c").unwrap(), Some(Value::from("x")));
    }
}
