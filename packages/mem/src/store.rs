//! The in-memory reactive store.

use tabstore_core::{
    Row, Scalar, ScalarUpdate, SortedRowIdsArgs, Store, Table, Tables, Values,
};

use crate::dispatch::Registry;
use crate::txn::ChangeSet;

/// An in-memory store: tables of rows of cells, plus flat values, with
/// change listeners and transactions.
///
/// Every write runs inside a transaction frame; writes outside an explicit
/// `start_transaction`/`finish_transaction` pair get an implicit frame of
/// their own, so listeners always observe net effects.
///
/// This store is deliberately loose: a cell write creates its row and table
/// as needed, and no schema is enforced. Typed guarantees live in the layer
/// above.
///
/// # Example
///
/// ```rust
/// use tabstore_core::{Scalar, ScalarUpdate, Store};
/// use tabstore_mem::MemStore;
///
/// let mut store = MemStore::new();
/// store.set_cell("pets", "fido", "species", ScalarUpdate::Set(Scalar::from("dog")));
/// assert_eq!(store.get_cell("pets", "fido", "species"), Some(Scalar::from("dog")));
/// ```
pub struct MemStore {
    pub(crate) tables: Tables,
    pub(crate) values: Values,
    pub(crate) txn_depth: usize,
    pub(crate) changes: ChangeSet,
    pub(crate) dispatching: bool,
    pub(crate) registry: Registry,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: Tables::new(),
            values: Values::new(),
            txn_depth: 0,
            changes: ChangeSet::default(),
            dispatching: false,
            registry: Registry::new(),
        }
    }

    /// Create a store with initial content. No listeners exist yet, so
    /// nothing is dispatched.
    pub fn with_content(tables: Tables, values: Values) -> Self {
        let mut store = Self::new();
        store.tables = tables;
        store.values = values;
        store
    }

    fn with_txn(&mut self, f: impl FnOnce(&mut Self)) {
        self.start_transaction();
        f(self);
        self.finish_transaction(None);
    }

    fn peek_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> Option<Scalar> {
        self.tables.get(table_id)?.get(row_id)?.get(cell_id).cloned()
    }

    /// Apply a cell write to storage without recording it. Emptied rows and
    /// tables are pruned.
    pub(crate) fn apply_cell(
        &mut self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
        new: Option<Scalar>,
    ) {
        match new {
            Some(scalar) => {
                self.tables
                    .entry(table_id.to_string())
                    .or_default()
                    .entry(row_id.to_string())
                    .or_default()
                    .insert(cell_id.to_string(), scalar);
            }
            None => {
                if let Some(table) = self.tables.get_mut(table_id) {
                    if let Some(row) = table.get_mut(row_id) {
                        row.remove(cell_id);
                        if row.is_empty() {
                            table.remove(row_id);
                        }
                    }
                    if table.is_empty() {
                        self.tables.remove(table_id);
                    }
                }
            }
        }
    }

    pub(crate) fn apply_value(&mut self, value_id: &str, new: Option<Scalar>) {
        match new {
            Some(scalar) => {
                self.values.insert(value_id.to_string(), scalar);
            }
            None => {
                self.values.remove(value_id);
            }
        }
    }

    fn write_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str, new: Option<Scalar>) {
        let old = self.peek_cell(table_id, row_id, cell_id);
        if old == new {
            return;
        }
        self.changes
            .record_cell(table_id, row_id, cell_id, old, new.clone());
        self.apply_cell(table_id, row_id, cell_id, new);
    }

    fn write_value(&mut self, value_id: &str, new: Option<Scalar>) {
        let old = self.values.get(value_id).cloned();
        if old == new {
            return;
        }
        self.changes.record_value(value_id, old, new.clone());
        self.apply_value(value_id, new);
    }

    /// Replace one row's content with `row`, removing cells not present in it.
    fn replace_row(&mut self, table_id: &str, row_id: &str, row: Row) {
        let existing: Vec<String> = self
            .tables
            .get(table_id)
            .and_then(|table| table.get(row_id))
            .map(|r| r.keys().filter(|c| !row.contains_key(*c)).cloned().collect())
            .unwrap_or_default();
        for cell_id in existing {
            self.write_cell(table_id, row_id, &cell_id, None);
        }
        for (cell_id, scalar) in row {
            self.write_cell(table_id, row_id, &cell_id, Some(scalar));
        }
    }

    fn replace_table(&mut self, table_id: &str, table: Table) {
        let existing: Vec<String> = self
            .tables
            .get(table_id)
            .map(|t| t.keys().filter(|r| !table.contains_key(*r)).cloned().collect())
            .unwrap_or_default();
        for row_id in existing {
            self.remove_row(table_id, &row_id);
        }
        for (row_id, row) in table {
            self.replace_row(table_id, &row_id, row);
        }
    }

    fn remove_row(&mut self, table_id: &str, row_id: &str) {
        let cells: Vec<String> = self
            .tables
            .get(table_id)
            .and_then(|table| table.get(row_id))
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        for cell_id in cells {
            self.write_cell(table_id, row_id, &cell_id, None);
        }
    }

    fn remove_table(&mut self, table_id: &str) {
        let rows: Vec<String> = self
            .tables
            .get(table_id)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default();
        for row_id in rows {
            self.remove_row(table_id, &row_id);
        }
    }

    fn revert(&mut self, changes: ChangeSet) {
        for ((t, r, c), (old, _)) in changes.cells {
            self.apply_cell(&t, &r, &c, old);
        }
        for (v, (old, _)) in changes.values {
            self.apply_value(&v, old);
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn scalar_rank(scalar: &Scalar) -> u8 {
    match scalar {
        Scalar::Null => 0,
        Scalar::Bool(_) => 1,
        Scalar::Number(_) => 2,
        Scalar::String(_) => 3,
    }
}

/// Total order over scalars for sorted-row-id queries: null, then booleans,
/// then numbers, then strings. NaN sorts after all other numbers.
pub(crate) fn scalar_cmp(a: &Scalar, b: &Scalar) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Scalar::Bool(x), Scalar::Bool(y)) => x.cmp(y),
        (Scalar::Number(x), Scalar::Number(y)) => {
            x.partial_cmp(y).unwrap_or_else(|| match (x.is_nan(), y.is_nan()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            })
        }
        (Scalar::String(x), Scalar::String(y)) => x.cmp(y),
        _ => scalar_rank(a).cmp(&scalar_rank(b)),
    }
}

impl Store for MemStore {
    fn get_tables(&self) -> Tables {
        self.tables.clone()
    }

    fn get_table(&self, table_id: &str) -> Table {
        self.tables.get(table_id).cloned().unwrap_or_default()
    }

    fn get_row(&self, table_id: &str, row_id: &str) -> Row {
        self.tables
            .get(table_id)
            .and_then(|table| table.get(row_id))
            .cloned()
            .unwrap_or_default()
    }

    fn get_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> Option<Scalar> {
        self.peek_cell(table_id, row_id, cell_id)
    }

    fn get_values(&self) -> Values {
        self.values.clone()
    }

    fn get_value(&self, value_id: &str) -> Option<Scalar> {
        self.values.get(value_id).cloned()
    }

    fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    fn has_table(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    fn has_row(&self, table_id: &str, row_id: &str) -> bool {
        self.tables
            .get(table_id)
            .is_some_and(|table| table.contains_key(row_id))
    }

    fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool {
        self.tables
            .get(table_id)
            .and_then(|table| table.get(row_id))
            .is_some_and(|row| row.contains_key(cell_id))
    }

    fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    fn has_value(&self, value_id: &str) -> bool {
        self.values.contains_key(value_id)
    }

    fn get_table_ids(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn get_row_ids(&self, table_id: &str) -> Vec<String> {
        self.tables
            .get(table_id)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String> {
        self.tables
            .get(table_id)
            .and_then(|table| table.get(row_id))
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_table_cell_ids(&self, table_id: &str) -> Vec<String> {
        let mut ids = std::collections::BTreeSet::new();
        if let Some(table) = self.tables.get(table_id) {
            for row in table.values() {
                ids.extend(row.keys().cloned());
            }
        }
        ids.into_iter().collect()
    }

    fn get_value_ids(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String> {
        let mut ids = self.get_row_ids(table_id);
        if let Some(cell_id) = cell_id {
            let table = self.tables.get(table_id);
            ids.sort_by(|a, b| {
                let cell = |row_id: &str| {
                    table
                        .and_then(|t| t.get(row_id))
                        .and_then(|row| row.get(cell_id))
                };
                match (cell(a), cell(b)) {
                    (Some(x), Some(y)) => scalar_cmp(x, y).then_with(|| a.cmp(b)),
                    // Rows without the sort cell come first.
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, None) => a.cmp(b),
                }
            });
        }
        if descending {
            ids.reverse();
        }
        let ids: Vec<String> = ids.into_iter().skip(offset).collect();
        match limit {
            Some(limit) => ids.into_iter().take(limit).collect(),
            None => ids,
        }
    }

    fn get_json(&self) -> String {
        serde_json::to_string(&(&self.tables, &self.values)).unwrap_or_default()
    }

    fn set_tables(&mut self, tables: Tables) {
        self.with_txn(|store| {
            let existing: Vec<String> = store
                .tables
                .keys()
                .filter(|t| !tables.contains_key(*t))
                .cloned()
                .collect();
            for table_id in existing {
                store.remove_table(&table_id);
            }
            for (table_id, table) in tables {
                store.replace_table(&table_id, table);
            }
        });
    }

    fn set_table(&mut self, table_id: &str, table: Table) {
        self.with_txn(|store| store.replace_table(table_id, table));
    }

    fn set_row(&mut self, table_id: &str, row_id: &str, row: Row) {
        self.with_txn(|store| store.replace_row(table_id, row_id, row));
    }

    fn set_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str, update: ScalarUpdate) {
        self.with_txn(|store| {
            let current = store.peek_cell(table_id, row_id, cell_id);
            let new = update.apply(current);
            store.write_cell(table_id, row_id, cell_id, new);
        });
    }

    fn set_values(&mut self, values: Values) {
        self.with_txn(|store| {
            let existing: Vec<String> = store
                .values
                .keys()
                .filter(|v| !values.contains_key(*v))
                .cloned()
                .collect();
            for value_id in existing {
                store.write_value(&value_id, None);
            }
            for (value_id, scalar) in values {
                store.write_value(&value_id, Some(scalar));
            }
        });
    }

    fn set_value(&mut self, value_id: &str, update: ScalarUpdate) {
        self.with_txn(|store| {
            let current = store.values.get(value_id).cloned();
            let new = update.apply(current);
            store.write_value(value_id, new);
        });
    }

    fn set_content(&mut self, tables: Tables, values: Values) {
        self.with_txn(|store| {
            store.set_tables(tables);
            store.set_values(values);
        });
    }

    fn set_json(&mut self, json: &str) {
        match serde_json::from_str::<(Tables, Values)>(json) {
            Ok((tables, values)) => self.set_content(tables, values),
            Err(e) => log::warn!("ignoring invalid store json: {}", e),
        }
    }

    fn del_tables(&mut self) {
        self.with_txn(|store| {
            let ids = store.get_table_ids();
            for table_id in ids {
                store.remove_table(&table_id);
            }
        });
    }

    fn del_table(&mut self, table_id: &str) {
        self.with_txn(|store| store.remove_table(table_id));
    }

    fn del_row(&mut self, table_id: &str, row_id: &str) {
        self.with_txn(|store| store.remove_row(table_id, row_id));
    }

    fn del_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str) {
        self.with_txn(|store| store.write_cell(table_id, row_id, cell_id, None));
    }

    fn del_values(&mut self) {
        self.with_txn(|store| {
            let ids = store.get_value_ids();
            for value_id in ids {
                store.write_value(&value_id, None);
            }
        });
    }

    fn del_value(&mut self, value_id: &str) {
        self.with_txn(|store| store.write_value(value_id, None));
    }

    fn start_transaction(&mut self) {
        self.txn_depth += 1;
        log::trace!("transaction frame opened (depth {})", self.txn_depth);
    }

    fn finish_transaction(&mut self, rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>) {
        if self.txn_depth == 0 {
            return;
        }
        self.txn_depth -= 1;
        if self.txn_depth > 0 {
            return;
        }
        if self.dispatching {
            // Writes made by mutator listeners fold into the open dispatch
            // round; the round recomputes net changes itself.
            return;
        }
        let changes = std::mem::take(&mut self.changes);
        if changes.is_empty() {
            return;
        }
        if let Some(pred) = rollback {
            if pred(&*self) {
                log::debug!(
                    "rolling back transaction ({} cell writes, {} value writes)",
                    changes.cells.len(),
                    changes.values.len()
                );
                self.revert(changes);
                return;
            }
        }
        log::trace!(
            "transaction finished ({} cell writes, {} value writes)",
            changes.cells.len(),
            changes.values.len()
        );
        self.dispatch(changes);
    }

    fn add_tables_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::TablesListener,
    ) -> tabstore_core::ListenerId {
        self.registry.add(mutator, crate::dispatch::Listener::Tables(listener))
    }

    fn add_table_ids_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::TableIdsListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::TableIds(listener))
    }

    fn add_table_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::TableListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::Table(table, listener))
    }

    fn add_row_ids_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::RowIdsListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::RowIds(table, listener))
    }

    fn add_sorted_row_ids_listener(
        &mut self,
        args: SortedRowIdsArgs,
        mutator: bool,
        listener: tabstore_core::SortedRowIdsListener,
    ) -> tabstore_core::ListenerId {
        let current = self.get_sorted_row_ids_with(&args);
        self.registry.add(
            mutator,
            crate::dispatch::Listener::SortedRowIds(args, current, listener),
        )
    }

    fn add_row_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        row: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::RowListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::Row(table, row, listener))
    }

    fn add_cell_ids_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        row: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::CellIdsListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::CellIds(table, row, listener))
    }

    fn add_cell_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        row: tabstore_core::IdFilter,
        cell: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::CellListener,
    ) -> tabstore_core::ListenerId {
        self.registry.add(
            mutator,
            crate::dispatch::Listener::Cell(table, row, cell, listener),
        )
    }

    fn add_values_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::ValuesListener,
    ) -> tabstore_core::ListenerId {
        self.registry.add(mutator, crate::dispatch::Listener::Values(listener))
    }

    fn add_value_ids_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::ValueIdsListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::ValueIds(listener))
    }

    fn add_value_listener(
        &mut self,
        value: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::ValueListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::Value(value, listener))
    }

    fn add_has_tables_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::HasListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::HasTables(listener))
    }

    fn add_has_table_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::HasTableListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::HasTable(table, listener))
    }

    fn add_has_row_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        row: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::HasRowListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::HasRow(table, row, listener))
    }

    fn add_has_cell_listener(
        &mut self,
        table: tabstore_core::IdFilter,
        row: tabstore_core::IdFilter,
        cell: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::HasCellListener,
    ) -> tabstore_core::ListenerId {
        self.registry.add(
            mutator,
            crate::dispatch::Listener::HasCell(table, row, cell, listener),
        )
    }

    fn add_has_values_listener(
        &mut self,
        mutator: bool,
        listener: tabstore_core::HasListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::HasValues(listener))
    }

    fn add_has_value_listener(
        &mut self,
        value: tabstore_core::IdFilter,
        mutator: bool,
        listener: tabstore_core::HasValueListener,
    ) -> tabstore_core::ListenerId {
        self.registry
            .add(mutator, crate::dispatch::Listener::HasValue(value, listener))
    }

    fn del_listener(&mut self, listener_id: tabstore_core::ListenerId) {
        self.registry.remove(listener_id);
    }

    fn call_listener(&mut self, listener_id: tabstore_core::ListenerId) {
        self.invoke_now(listener_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstore_core::ScalarUpdate;

    fn row(pairs: &[(&str, Scalar)]) -> Row {
        pairs
            .iter()
            .map(|(c, s)| (c.to_string(), s.clone()))
            .collect()
    }

    #[test]
    fn cell_write_creates_row_and_table() {
        let mut store = MemStore::new();
        store.set_cell("t", "r", "c", ScalarUpdate::Set(Scalar::from(1i64)));

        assert!(store.has_table("t"));
        assert!(store.has_row("t", "r"));
        assert_eq!(store.get_cell("t", "r", "c"), Some(Scalar::from(1i64)));
    }

    #[test]
    fn deleting_last_cell_prunes_row_and_table() {
        let mut store = MemStore::new();
        store.set_cell("t", "r", "c", ScalarUpdate::Set(Scalar::from(1i64)));
        store.del_cell("t", "r", "c");

        assert!(!store.has_row("t", "r"));
        assert!(!store.has_table("t"));
        assert!(!store.has_tables());
    }

    #[test]
    fn set_row_replaces_existing_cells() {
        let mut store = MemStore::new();
        store.set_row("t", "r", row(&[("a", Scalar::from(1i64)), ("b", Scalar::from(2i64))]));
        store.set_row("t", "r", row(&[("b", Scalar::from(3i64))]));

        assert_eq!(store.get_cell("t", "r", "a"), None);
        assert_eq!(store.get_cell("t", "r", "b"), Some(Scalar::from(3i64)));
    }

    #[test]
    fn mapper_update_sees_current_and_can_delete() {
        let mut store = MemStore::new();
        store.set_value("n", ScalarUpdate::Set(Scalar::from(1i64)));
        store.set_value(
            "n",
            ScalarUpdate::Map(Box::new(|cur| {
                let n = cur.and_then(|s| s.as_number()).unwrap_or(0.0);
                Some(Scalar::Number(n + 1.0))
            })),
        );
        assert_eq!(store.get_value("n"), Some(Scalar::Number(2.0)));

        store.set_value("n", ScalarUpdate::Map(Box::new(|_| None)));
        assert_eq!(store.get_value("n"), None);
        assert!(!store.has_values());
    }

    #[test]
    fn sorted_row_ids_by_cell() {
        let mut store = MemStore::new();
        store.set_row("t", "a", row(&[("age", Scalar::from(30i64))]));
        store.set_row("t", "b", row(&[("age", Scalar::from(10i64))]));
        store.set_row("t", "c", row(&[("age", Scalar::from(20i64))]));

        assert_eq!(
            store.get_sorted_row_ids("t", Some("age"), false, 0, None),
            vec!["b", "c", "a"]
        );
        assert_eq!(
            store.get_sorted_row_ids("t", Some("age"), true, 0, Some(2)),
            vec!["a", "c"]
        );
        assert_eq!(
            store.get_sorted_row_ids("t", None, false, 1, None),
            vec!["b", "c"]
        );
    }

    #[test]
    fn sorted_row_ids_options_form_matches_positional() {
        let mut store = MemStore::new();
        store.set_row("t", "a", row(&[("age", Scalar::from(30i64))]));
        store.set_row("t", "b", row(&[("age", Scalar::from(10i64))]));

        let args = SortedRowIdsArgs::new("t").by_cell("age").descending(true);
        assert_eq!(
            store.get_sorted_row_ids_with(&args),
            store.get_sorted_row_ids("t", Some("age"), true, 0, None)
        );
    }

    #[test]
    fn json_roundtrip() {
        let mut store = MemStore::new();
        store.set_cell("t", "r", "c", ScalarUpdate::Set(Scalar::from("x")));
        store.set_value("v", ScalarUpdate::Set(Scalar::from(true)));

        let json = store.get_json();
        let mut other = MemStore::new();
        other.set_json(&json);

        assert_eq!(other.get_tables(), store.get_tables());
        assert_eq!(other.get_values(), store.get_values());
    }

    #[test]
    fn invalid_json_is_a_no_op() {
        let mut store = MemStore::new();
        store.set_value("v", ScalarUpdate::Set(Scalar::from(1i64)));
        store.set_json("not json");
        assert_eq!(store.get_value("v"), Some(Scalar::from(1i64)));
    }

    #[test]
    fn set_content_replaces_both_halves() {
        let mut store = MemStore::new();
        store.set_cell("old", "r", "c", ScalarUpdate::Set(Scalar::from(1i64)));
        store.set_value("old", ScalarUpdate::Set(Scalar::from(1i64)));

        let mut tables = Tables::new();
        tables
            .entry("new".to_string())
            .or_default()
            .insert("r".to_string(), row(&[("c", Scalar::from(2i64))]));
        let mut values = Values::new();
        values.insert("new".to_string(), Scalar::from(2i64));
        store.set_content(tables, values);

        assert!(!store.has_table("old"));
        assert!(store.has_table("new"));
        assert_eq!(store.get_value("old"), None);
        assert_eq!(store.get_value("new"), Some(Scalar::from(2i64)));
    }
}
