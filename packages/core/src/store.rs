//! The Store trait: the full surface of a reactive tabular store.

use crate::listener::*;
use crate::{IdFilter, Row, Scalar, SortedRowIdsArgs, Table, Tables, Values};

/// A cell or value write: either a literal scalar or a transform of the
/// current stored scalar.
///
/// The mapper form receives the current scalar (or `None` if absent) and its
/// `None` return deletes the entry rather than writing a sentinel.
pub enum ScalarUpdate {
    /// Write this scalar.
    Set(Scalar),
    /// Transform the current scalar; returning `None` deletes.
    Map(Box<dyn FnOnce(Option<Scalar>) -> Option<Scalar>>),
}

impl ScalarUpdate {
    /// Resolve this update against the current stored scalar.
    pub fn apply(self, current: Option<Scalar>) -> Option<Scalar> {
        match self {
            ScalarUpdate::Set(scalar) => Some(scalar),
            ScalarUpdate::Map(f) => f(current),
        }
    }
}

impl From<Scalar> for ScalarUpdate {
    fn from(scalar: Scalar) -> Self {
        ScalarUpdate::Set(scalar)
    }
}

/// A reactive tabular store: tables of rows of cells, plus flat values,
/// with change listeners and transactions.
///
/// All reads are by-value snapshots. Writes are infallible at this layer;
/// anything that can make a write illegal (schema violations, missing rows)
/// is enforced by layers above. Listeners observe the net effect of a
/// transaction once, with mutator-flagged listeners running before
/// non-mutator ones.
///
/// # Object Safety
///
/// This trait is object-safe: listener callbacks receive `&mut dyn Store`
/// so that work done from inside a callback goes through the same surface.
pub trait Store {
    // --- reads ---

    /// Snapshot of all tabular data.
    fn get_tables(&self) -> Tables;

    /// Snapshot of one table. Empty if the table does not exist.
    fn get_table(&self, table_id: &str) -> Table;

    /// Snapshot of one row. Empty if the row does not exist.
    fn get_row(&self, table_id: &str, row_id: &str) -> Row;

    /// One cell, or `None` if absent.
    fn get_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> Option<Scalar>;

    /// Snapshot of all values.
    fn get_values(&self) -> Values;

    /// One value, or `None` if absent.
    fn get_value(&self, value_id: &str) -> Option<Scalar>;

    /// Whether any tabular data exists.
    fn has_tables(&self) -> bool;

    /// Whether a table exists.
    fn has_table(&self, table_id: &str) -> bool;

    /// Whether a row exists.
    fn has_row(&self, table_id: &str, row_id: &str) -> bool;

    /// Whether a cell exists.
    fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool;

    /// Whether any values exist.
    fn has_values(&self) -> bool;

    /// Whether a value exists.
    fn has_value(&self, value_id: &str) -> bool;

    /// Ids of all tables.
    fn get_table_ids(&self) -> Vec<String>;

    /// Ids of all rows in a table.
    fn get_row_ids(&self, table_id: &str) -> Vec<String>;

    /// Ids of all cells in a row.
    fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String>;

    /// Union of cell ids used across all rows of a table.
    fn get_table_cell_ids(&self, table_id: &str) -> Vec<String>;

    /// Ids of all values.
    fn get_value_ids(&self) -> Vec<String>;

    /// Row ids of a table, sorted by a cell's value (or by row id when
    /// `cell_id` is `None`), with direction, offset and limit.
    fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String>;

    /// Options-object form of [`get_sorted_row_ids`](Store::get_sorted_row_ids).
    fn get_sorted_row_ids_with(&self, args: &SortedRowIdsArgs) -> Vec<String> {
        self.get_sorted_row_ids(
            &args.table_id,
            args.cell_id.as_deref(),
            args.descending,
            args.offset,
            args.limit,
        )
    }

    /// Serialize the whole store (tables and values) to JSON.
    fn get_json(&self) -> String;

    // --- writes ---

    /// Replace all tabular data.
    fn set_tables(&mut self, tables: Tables);

    /// Replace one table.
    fn set_table(&mut self, table_id: &str, table: Table);

    /// Replace one row.
    fn set_row(&mut self, table_id: &str, row_id: &str, row: Row);

    /// Write one cell, creating the row and table as needed.
    fn set_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str, update: ScalarUpdate);

    /// Replace all values.
    fn set_values(&mut self, values: Values);

    /// Write one value.
    fn set_value(&mut self, value_id: &str, update: ScalarUpdate);

    /// Replace all tabular data and all values together.
    fn set_content(&mut self, tables: Tables, values: Values);

    /// Deserialize the whole store from JSON. Invalid JSON is a no-op.
    fn set_json(&mut self, json: &str);

    /// Delete all tabular data.
    fn del_tables(&mut self);

    /// Delete one table.
    fn del_table(&mut self, table_id: &str);

    /// Delete one row.
    fn del_row(&mut self, table_id: &str, row_id: &str);

    /// Delete one cell.
    fn del_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str);

    /// Delete all values.
    fn del_values(&mut self);

    /// Delete one value.
    fn del_value(&mut self, value_id: &str);

    // --- transactions ---

    /// Open a transaction frame. Frames nest; listeners fire once when the
    /// outermost frame finishes.
    fn start_transaction(&mut self);

    /// Close a transaction frame. At the outermost frame, the rollback
    /// predicate (if any) runs first: returning `true` reverts every change
    /// made inside the transaction and nothing is dispatched.
    fn finish_transaction(&mut self, rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>);

    /// Run `actions` inside a transaction frame.
    fn transaction(
        &mut self,
        actions: &mut dyn FnMut(&mut dyn Store),
        rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>,
    ) where
        Self: Sized,
    {
        self.start_transaction();
        actions(self);
        self.finish_transaction(rollback);
    }

    // --- listeners ---

    /// Listen to any tabular change.
    fn add_tables_listener(&mut self, mutator: bool, listener: TablesListener) -> ListenerId;

    /// Listen to the set of table ids changing.
    fn add_table_ids_listener(&mut self, mutator: bool, listener: TableIdsListener) -> ListenerId;

    /// Listen to changes within matching tables.
    fn add_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: TableListener,
    ) -> ListenerId;

    /// Listen to a matching table's set of row ids changing.
    fn add_row_ids_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: RowIdsListener,
    ) -> ListenerId;

    /// Listen to a sorted-row-id query's result changing. The table id must
    /// be concrete (no wildcard) because the query is evaluated per table.
    fn add_sorted_row_ids_listener(
        &mut self,
        args: SortedRowIdsArgs,
        mutator: bool,
        listener: SortedRowIdsListener,
    ) -> ListenerId;

    /// Listen to changes within matching rows.
    fn add_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: RowListener,
    ) -> ListenerId;

    /// Listen to a matching row's set of cell ids changing.
    fn add_cell_ids_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: CellIdsListener,
    ) -> ListenerId;

    /// Listen to matching cells changing.
    fn add_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: CellListener,
    ) -> ListenerId;

    /// Listen to any value change.
    fn add_values_listener(&mut self, mutator: bool, listener: ValuesListener) -> ListenerId;

    /// Listen to the set of value ids changing.
    fn add_value_ids_listener(&mut self, mutator: bool, listener: ValueIdsListener) -> ListenerId;

    /// Listen to matching values changing.
    fn add_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: ValueListener,
    ) -> ListenerId;

    /// Listen to "any tables at all" flipping.
    fn add_has_tables_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId;

    /// Listen to a matching table's existence flipping.
    fn add_has_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: HasTableListener,
    ) -> ListenerId;

    /// Listen to a matching row's existence flipping.
    fn add_has_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: HasRowListener,
    ) -> ListenerId;

    /// Listen to a matching cell's existence flipping.
    fn add_has_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: HasCellListener,
    ) -> ListenerId;

    /// Listen to "any values at all" flipping.
    fn add_has_values_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId;

    /// Listen to a matching value's existence flipping.
    fn add_has_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: HasValueListener,
    ) -> ListenerId;

    /// Deregister a listener.
    fn del_listener(&mut self, listener_id: ListenerId);

    /// Force-invoke a listener now, against the current state.
    fn call_listener(&mut self, listener_id: ListenerId);
}

// Blanket implementations for references and boxes

impl<T: Store + ?Sized> Store for &mut T {
    fn get_tables(&self) -> Tables {
        (**self).get_tables()
    }
    fn get_table(&self, table_id: &str) -> Table {
        (**self).get_table(table_id)
    }
    fn get_row(&self, table_id: &str, row_id: &str) -> Row {
        (**self).get_row(table_id, row_id)
    }
    fn get_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> Option<Scalar> {
        (**self).get_cell(table_id, row_id, cell_id)
    }
    fn get_values(&self) -> Values {
        (**self).get_values()
    }
    fn get_value(&self, value_id: &str) -> Option<Scalar> {
        (**self).get_value(value_id)
    }
    fn has_tables(&self) -> bool {
        (**self).has_tables()
    }
    fn has_table(&self, table_id: &str) -> bool {
        (**self).has_table(table_id)
    }
    fn has_row(&self, table_id: &str, row_id: &str) -> bool {
        (**self).has_row(table_id, row_id)
    }
    fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool {
        (**self).has_cell(table_id, row_id, cell_id)
    }
    fn has_values(&self) -> bool {
        (**self).has_values()
    }
    fn has_value(&self, value_id: &str) -> bool {
        (**self).has_value(value_id)
    }
    fn get_table_ids(&self) -> Vec<String> {
        (**self).get_table_ids()
    }
    fn get_row_ids(&self, table_id: &str) -> Vec<String> {
        (**self).get_row_ids(table_id)
    }
    fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String> {
        (**self).get_cell_ids(table_id, row_id)
    }
    fn get_table_cell_ids(&self, table_id: &str) -> Vec<String> {
        (**self).get_table_cell_ids(table_id)
    }
    fn get_value_ids(&self) -> Vec<String> {
        (**self).get_value_ids()
    }
    fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String> {
        (**self).get_sorted_row_ids(table_id, cell_id, descending, offset, limit)
    }
    fn get_json(&self) -> String {
        (**self).get_json()
    }
    fn set_tables(&mut self, tables: Tables) {
        (**self).set_tables(tables)
    }
    fn set_table(&mut self, table_id: &str, table: Table) {
        (**self).set_table(table_id, table)
    }
    fn set_row(&mut self, table_id: &str, row_id: &str, row: Row) {
        (**self).set_row(table_id, row_id, row)
    }
    fn set_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str, update: ScalarUpdate) {
        (**self).set_cell(table_id, row_id, cell_id, update)
    }
    fn set_values(&mut self, values: Values) {
        (**self).set_values(values)
    }
    fn set_value(&mut self, value_id: &str, update: ScalarUpdate) {
        (**self).set_value(value_id, update)
    }
    fn set_content(&mut self, tables: Tables, values: Values) {
        (**self).set_content(tables, values)
    }
    fn set_json(&mut self, json: &str) {
        (**self).set_json(json)
    }
    fn del_tables(&mut self) {
        (**self).del_tables()
    }
    fn del_table(&mut self, table_id: &str) {
        (**self).del_table(table_id)
    }
    fn del_row(&mut self, table_id: &str, row_id: &str) {
        (**self).del_row(table_id, row_id)
    }
    fn del_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str) {
        (**self).del_cell(table_id, row_id, cell_id)
    }
    fn del_values(&mut self) {
        (**self).del_values()
    }
    fn del_value(&mut self, value_id: &str) {
        (**self).del_value(value_id)
    }
    fn start_transaction(&mut self) {
        (**self).start_transaction()
    }
    fn finish_transaction(&mut self, rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>) {
        (**self).finish_transaction(rollback)
    }
    fn add_tables_listener(&mut self, mutator: bool, listener: TablesListener) -> ListenerId {
        (**self).add_tables_listener(mutator, listener)
    }
    fn add_table_ids_listener(&mut self, mutator: bool, listener: TableIdsListener) -> ListenerId {
        (**self).add_table_ids_listener(mutator, listener)
    }
    fn add_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: TableListener,
    ) -> ListenerId {
        (**self).add_table_listener(table, mutator, listener)
    }
    fn add_row_ids_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: RowIdsListener,
    ) -> ListenerId {
        (**self).add_row_ids_listener(table, mutator, listener)
    }
    fn add_sorted_row_ids_listener(
        &mut self,
        args: SortedRowIdsArgs,
        mutator: bool,
        listener: SortedRowIdsListener,
    ) -> ListenerId {
        (**self).add_sorted_row_ids_listener(args, mutator, listener)
    }
    fn add_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: RowListener,
    ) -> ListenerId {
        (**self).add_row_listener(table, row, mutator, listener)
    }
    fn add_cell_ids_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: CellIdsListener,
    ) -> ListenerId {
        (**self).add_cell_ids_listener(table, row, mutator, listener)
    }
    fn add_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: CellListener,
    ) -> ListenerId {
        (**self).add_cell_listener(table, row, cell, mutator, listener)
    }
    fn add_values_listener(&mut self, mutator: bool, listener: ValuesListener) -> ListenerId {
        (**self).add_values_listener(mutator, listener)
    }
    fn add_value_ids_listener(&mut self, mutator: bool, listener: ValueIdsListener) -> ListenerId {
        (**self).add_value_ids_listener(mutator, listener)
    }
    fn add_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: ValueListener,
    ) -> ListenerId {
        (**self).add_value_listener(value, mutator, listener)
    }
    fn add_has_tables_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId {
        (**self).add_has_tables_listener(mutator, listener)
    }
    fn add_has_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: HasTableListener,
    ) -> ListenerId {
        (**self).add_has_table_listener(table, mutator, listener)
    }
    fn add_has_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: HasRowListener,
    ) -> ListenerId {
        (**self).add_has_row_listener(table, row, mutator, listener)
    }
    fn add_has_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: HasCellListener,
    ) -> ListenerId {
        (**self).add_has_cell_listener(table, row, cell, mutator, listener)
    }
    fn add_has_values_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId {
        (**self).add_has_values_listener(mutator, listener)
    }
    fn add_has_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: HasValueListener,
    ) -> ListenerId {
        (**self).add_has_value_listener(value, mutator, listener)
    }
    fn del_listener(&mut self, listener_id: ListenerId) {
        (**self).del_listener(listener_id)
    }
    fn call_listener(&mut self, listener_id: ListenerId) {
        (**self).call_listener(listener_id)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn get_tables(&self) -> Tables {
        self.as_ref().get_tables()
    }
    fn get_table(&self, table_id: &str) -> Table {
        self.as_ref().get_table(table_id)
    }
    fn get_row(&self, table_id: &str, row_id: &str) -> Row {
        self.as_ref().get_row(table_id, row_id)
    }
    fn get_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> Option<Scalar> {
        self.as_ref().get_cell(table_id, row_id, cell_id)
    }
    fn get_values(&self) -> Values {
        self.as_ref().get_values()
    }
    fn get_value(&self, value_id: &str) -> Option<Scalar> {
        self.as_ref().get_value(value_id)
    }
    fn has_tables(&self) -> bool {
        self.as_ref().has_tables()
    }
    fn has_table(&self, table_id: &str) -> bool {
        self.as_ref().has_table(table_id)
    }
    fn has_row(&self, table_id: &str, row_id: &str) -> bool {
        self.as_ref().has_row(table_id, row_id)
    }
    fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool {
        self.as_ref().has_cell(table_id, row_id, cell_id)
    }
    fn has_values(&self) -> bool {
        self.as_ref().has_values()
    }
    fn has_value(&self, value_id: &str) -> bool {
        self.as_ref().has_value(value_id)
    }
    fn get_table_ids(&self) -> Vec<String> {
        self.as_ref().get_table_ids()
    }
    fn get_row_ids(&self, table_id: &str) -> Vec<String> {
        self.as_ref().get_row_ids(table_id)
    }
    fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String> {
        self.as_ref().get_cell_ids(table_id, row_id)
    }
    fn get_table_cell_ids(&self, table_id: &str) -> Vec<String> {
        self.as_ref().get_table_cell_ids(table_id)
    }
    fn get_value_ids(&self) -> Vec<String> {
        self.as_ref().get_value_ids()
    }
    fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String> {
        self.as_ref()
            .get_sorted_row_ids(table_id, cell_id, descending, offset, limit)
    }
    fn get_json(&self) -> String {
        self.as_ref().get_json()
    }
    fn set_tables(&mut self, tables: Tables) {
        self.as_mut().set_tables(tables)
    }
    fn set_table(&mut self, table_id: &str, table: Table) {
        self.as_mut().set_table(table_id, table)
    }
    fn set_row(&mut self, table_id: &str, row_id: &str, row: Row) {
        self.as_mut().set_row(table_id, row_id, row)
    }
    fn set_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str, update: ScalarUpdate) {
        self.as_mut().set_cell(table_id, row_id, cell_id, update)
    }
    fn set_values(&mut self, values: Values) {
        self.as_mut().set_values(values)
    }
    fn set_value(&mut self, value_id: &str, update: ScalarUpdate) {
        self.as_mut().set_value(value_id, update)
    }
    fn set_content(&mut self, tables: Tables, values: Values) {
        self.as_mut().set_content(tables, values)
    }
    fn set_json(&mut self, json: &str) {
        self.as_mut().set_json(json)
    }
    fn del_tables(&mut self) {
        self.as_mut().del_tables()
    }
    fn del_table(&mut self, table_id: &str) {
        self.as_mut().del_table(table_id)
    }
    fn del_row(&mut self, table_id: &str, row_id: &str) {
        self.as_mut().del_row(table_id, row_id)
    }
    fn del_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str) {
        self.as_mut().del_cell(table_id, row_id, cell_id)
    }
    fn del_values(&mut self) {
        self.as_mut().del_values()
    }
    fn del_value(&mut self, value_id: &str) {
        self.as_mut().del_value(value_id)
    }
    fn start_transaction(&mut self) {
        self.as_mut().start_transaction()
    }
    fn finish_transaction(&mut self, rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>) {
        self.as_mut().finish_transaction(rollback)
    }
    fn add_tables_listener(&mut self, mutator: bool, listener: TablesListener) -> ListenerId {
        self.as_mut().add_tables_listener(mutator, listener)
    }
    fn add_table_ids_listener(&mut self, mutator: bool, listener: TableIdsListener) -> ListenerId {
        self.as_mut().add_table_ids_listener(mutator, listener)
    }
    fn add_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: TableListener,
    ) -> ListenerId {
        self.as_mut().add_table_listener(table, mutator, listener)
    }
    fn add_row_ids_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: RowIdsListener,
    ) -> ListenerId {
        self.as_mut().add_row_ids_listener(table, mutator, listener)
    }
    fn add_sorted_row_ids_listener(
        &mut self,
        args: SortedRowIdsArgs,
        mutator: bool,
        listener: SortedRowIdsListener,
    ) -> ListenerId {
        self.as_mut()
            .add_sorted_row_ids_listener(args, mutator, listener)
    }
    fn add_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: RowListener,
    ) -> ListenerId {
        self.as_mut().add_row_listener(table, row, mutator, listener)
    }
    fn add_cell_ids_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: CellIdsListener,
    ) -> ListenerId {
        self.as_mut()
            .add_cell_ids_listener(table, row, mutator, listener)
    }
    fn add_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: CellListener,
    ) -> ListenerId {
        self.as_mut()
            .add_cell_listener(table, row, cell, mutator, listener)
    }
    fn add_values_listener(&mut self, mutator: bool, listener: ValuesListener) -> ListenerId {
        self.as_mut().add_values_listener(mutator, listener)
    }
    fn add_value_ids_listener(&mut self, mutator: bool, listener: ValueIdsListener) -> ListenerId {
        self.as_mut().add_value_ids_listener(mutator, listener)
    }
    fn add_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: ValueListener,
    ) -> ListenerId {
        self.as_mut().add_value_listener(value, mutator, listener)
    }
    fn add_has_tables_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId {
        self.as_mut().add_has_tables_listener(mutator, listener)
    }
    fn add_has_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        listener: HasTableListener,
    ) -> ListenerId {
        self.as_mut().add_has_table_listener(table, mutator, listener)
    }
    fn add_has_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        listener: HasRowListener,
    ) -> ListenerId {
        self.as_mut()
            .add_has_row_listener(table, row, mutator, listener)
    }
    fn add_has_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        listener: HasCellListener,
    ) -> ListenerId {
        self.as_mut()
            .add_has_cell_listener(table, row, cell, mutator, listener)
    }
    fn add_has_values_listener(&mut self, mutator: bool, listener: HasListener) -> ListenerId {
        self.as_mut().add_has_values_listener(mutator, listener)
    }
    fn add_has_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        listener: HasValueListener,
    ) -> ListenerId {
        self.as_mut().add_has_value_listener(value, mutator, listener)
    }
    fn del_listener(&mut self, listener_id: ListenerId) {
        self.as_mut().del_listener(listener_id)
    }
    fn call_listener(&mut self, listener_id: ListenerId) {
        self.as_mut().call_listener(listener_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_update_resolves() {
        let set = ScalarUpdate::from(Scalar::from(1i64));
        assert_eq!(set.apply(None), Some(Scalar::from(1i64)));

        let bump = ScalarUpdate::Map(Box::new(|current| {
            let n = current.and_then(|s| s.as_number()).unwrap_or(0.0);
            Some(Scalar::Number(n + 1.0))
        }));
        assert_eq!(
            bump.apply(Some(Scalar::Number(2.0))),
            Some(Scalar::Number(3.0))
        );

        let delete = ScalarUpdate::Map(Box::new(|_| None));
        assert_eq!(delete.apply(Some(Scalar::from(true))), None);
    }
}
