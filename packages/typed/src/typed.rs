//! The typed store facade.
//!
//! [`TypedStore`] wraps any [`Store`] together with an immutable [`Schema`]:
//! reads decode, writes encode and pass the scalar guard, and everything
//! identifier-, existence-, or transaction-shaped delegates straight to the
//! wrapped store. The facade holds no state of its own beyond the schema,
//! so transactions and rollback behave exactly as the underlying store
//! defines them.

use std::sync::Arc;

use tabstore_core::{SortedRowIdsArgs, Store};

use crate::error::Error;
use crate::guard::{cell_path, value_path};
use crate::row::{
    decode_row, decode_table, decode_tables, encode_field, encode_row, encode_table,
    encode_tables,
};
use crate::schema::Schema;
use crate::value::{AppRow, AppTable, AppTables, AppValues, Value};

/// A typed view handed to listener callbacks and transaction blocks, so
/// nested calls stay typed.
pub type TypedRef<'a> = TypedStore<&'a mut dyn Store>;

/// A cell or value write: either a literal value or a mapper applied to the
/// decoded current value. A mapper returning `None` deletes the entry.
pub enum Update {
    Set(Value),
    With(Box<dyn FnOnce(Option<Value>) -> Option<Value>>),
}

impl Update {
    /// Mapper form: the function observes the decoded current value (or
    /// `None` when absent) and returns the new value, `None` to delete.
    pub fn with(f: impl FnOnce(Option<Value>) -> Option<Value> + 'static) -> Self {
        Update::With(Box::new(f))
    }
}

impl From<Value> for Update {
    fn from(value: Value) -> Self {
        Update::Set(value)
    }
}

impl From<&str> for Update {
    fn from(s: &str) -> Self {
        Update::Set(Value::from(s))
    }
}

impl From<String> for Update {
    fn from(s: String) -> Self {
        Update::Set(Value::from(s))
    }
}

impl From<bool> for Update {
    fn from(b: bool) -> Self {
        Update::Set(Value::from(b))
    }
}

impl From<i64> for Update {
    fn from(i: i64) -> Self {
        Update::Set(Value::from(i))
    }
}

impl From<f64> for Update {
    fn from(f: f64) -> Self {
        Update::Set(Value::from(f))
    }
}

impl From<i128> for Update {
    fn from(i: i128) -> Self {
        Update::Set(Value::from(i))
    }
}

/// Typed facade over a [`Store`].
pub struct TypedStore<S: Store> {
    pub(crate) store: S,
    pub(crate) schema: Arc<Schema>,
}

impl<S: Store> TypedStore<S> {
    pub fn new(store: S, schema: Schema) -> Self {
        Self {
            store,
            schema: Arc::new(schema),
        }
    }

    /// Wrap a store with an already-shared schema. Used when several
    /// facades (or listener re-entries) share one declaration.
    pub fn with_schema(store: S, schema: Arc<Schema>) -> Self {
        Self { store, schema }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    // --- reads (decode) ---

    /// All declared tables, decoded. Undeclared table ids in storage are
    /// not surfaced.
    pub fn get_tables(&self) -> Result<AppTables, Error> {
        decode_tables(&self.schema, &self.store.get_tables())
    }

    /// One table, decoded. The table id must be declared.
    pub fn get_table(&self, table_id: &str) -> Result<AppTable, Error> {
        let shape = self.schema.require_row_shape(table_id)?;
        decode_table(shape, &self.store.get_table(table_id))
    }

    /// One row, decoded, or `None` when the row does not exist. The table
    /// id must be declared.
    pub fn get_row(&self, table_id: &str, row_id: &str) -> Result<Option<AppRow>, Error> {
        let shape = self.schema.require_row_shape(table_id)?;
        decode_row(shape, &self.store.get_row(table_id, row_id))
    }

    /// Like [`get_row`](TypedStore::get_row), but an absent row is an
    /// error.
    pub fn require_row(&self, table_id: &str, row_id: &str) -> Result<AppRow, Error> {
        self.get_row(table_id, row_id)?.ok_or_else(|| Error::MissingRow {
            table_id: table_id.to_string(),
            row_id: row_id.to_string(),
        })
    }

    /// One cell, decoded. Both the table and the cell id must be declared.
    pub fn get_cell(
        &self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
    ) -> Result<Option<Value>, Error> {
        let codec = self.schema.require_cell_codec(table_id, cell_id)?;
        match self.store.get_cell(table_id, row_id, cell_id) {
            Some(scalar) => Ok(Some(codec.decode(&scalar)?)),
            None => Ok(None),
        }
    }

    /// All declared values, decoded. Undeclared value ids in storage are
    /// not surfaced.
    pub fn get_values(&self) -> Result<AppValues, Error> {
        let mut decoded = AppValues::new();
        for (value_id, scalar) in &self.store.get_values() {
            if let Some(codec) = self.schema.value_codec(value_id) {
                decoded.insert(value_id.clone(), codec.decode(scalar)?);
            }
        }
        Ok(decoded)
    }

    /// One value, decoded. An undeclared value id reads as absent rather
    /// than raising.
    pub fn get_value(&self, value_id: &str) -> Result<Option<Value>, Error> {
        let Some(codec) = self.schema.value_codec(value_id) else {
            return Ok(None);
        };
        match self.store.get_value(value_id) {
            Some(scalar) => Ok(Some(codec.decode(&scalar)?)),
            None => Ok(None),
        }
    }

    // --- writes (encode + guard) ---

    /// Replace every declared table from `tables`. Declared tables missing
    /// from the input are deleted; undeclared table ids — in the input or
    /// in storage — are left untouched.
    pub fn set_tables(&mut self, tables: AppTables) -> Result<(), Error> {
        let mut encoded = encode_tables(&self.schema, &tables)?;
        let declared: Vec<String> = self.schema.table_ids().map(String::from).collect();
        self.store.start_transaction();
        for table_id in &declared {
            match encoded.remove(table_id) {
                Some(table) => self.store.set_table(table_id, table),
                None => self.store.del_table(table_id),
            }
        }
        self.store.finish_transaction(None);
        Ok(())
    }

    /// Replace one declared table.
    pub fn set_table(&mut self, table_id: &str, table: AppTable) -> Result<(), Error> {
        let encoded = encode_table(&self.schema, table_id, &table)?;
        self.store.set_table(table_id, encoded);
        Ok(())
    }

    /// Replace one row. This is the only way a row comes into existence.
    pub fn set_row(&mut self, table_id: &str, row_id: &str, row: AppRow) -> Result<(), Error> {
        let encoded = encode_row(&self.schema, table_id, row_id, &row)?;
        self.store.set_row(table_id, row_id, encoded);
        Ok(())
    }

    /// Shallow-merge a partial row over the current one and write the
    /// result as a full row. Fails with [`Error::MissingRow`] when the row
    /// does not exist, so it cannot create one.
    pub fn set_partial_row(
        &mut self,
        table_id: &str,
        row_id: &str,
        partial: AppRow,
    ) -> Result<(), Error> {
        let mut merged = self.require_row(table_id, row_id)?;
        merged.extend(partial);
        self.set_row(table_id, row_id, merged)
    }

    /// Write one cell of an existing row. A literal or mapper result that
    /// encodes to absence deletes the cell. Fails with
    /// [`Error::MissingRow`] when the row does not exist: a lone cell can
    /// never satisfy the row shape, so rows are never auto-created here.
    pub fn set_cell(
        &mut self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
        update: impl Into<Update>,
    ) -> Result<(), Error> {
        let codec = Arc::clone(self.schema.require_cell_codec(table_id, cell_id)?);
        if !self.store.has_row(table_id, row_id) {
            return Err(Error::MissingRow {
                table_id: table_id.to_string(),
                row_id: row_id.to_string(),
            });
        }
        let value = match update.into() {
            Update::Set(value) => Some(value),
            Update::With(mapper) => {
                let current = match self.store.get_cell(table_id, row_id, cell_id) {
                    Some(scalar) => Some(codec.decode(&scalar)?),
                    None => None,
                };
                mapper(current)
            }
        };
        let encoded = match value {
            Some(value) => {
                encode_field(&codec, &value, || cell_path(table_id, row_id, cell_id))?
            }
            None => None,
        };
        match encoded {
            Some(scalar) => self
                .store
                .set_cell(table_id, row_id, cell_id, scalar.into()),
            None => self.store.del_cell(table_id, row_id, cell_id),
        }
        Ok(())
    }

    /// Replace every declared value from `values`. Declared ids missing
    /// from the input are deleted; undeclared ids are left untouched.
    pub fn set_values(&mut self, mut values: AppValues) -> Result<(), Error> {
        let declared: Vec<String> = self.schema.value_ids().map(String::from).collect();
        // Encode everything up front so a failure writes nothing.
        let mut encoded = Vec::with_capacity(declared.len());
        for value_id in &declared {
            let scalar = match values.remove(value_id) {
                Some(value) => {
                    let codec = self.schema.require_value_codec(value_id)?;
                    encode_field(codec, &value, || value_path(value_id))?
                }
                None => None,
            };
            encoded.push((value_id.clone(), scalar));
        }
        self.store.start_transaction();
        for (value_id, scalar) in encoded {
            match scalar {
                Some(scalar) => self.store.set_value(&value_id, scalar.into()),
                None => self.store.del_value(&value_id),
            }
        }
        self.store.finish_transaction(None);
        Ok(())
    }

    /// Write one value. An undeclared value id is a silent no-op. A
    /// literal or mapper result that encodes to absence deletes the value.
    pub fn set_value(&mut self, value_id: &str, update: impl Into<Update>) -> Result<(), Error> {
        let Some(codec) = self.schema.value_codec(value_id).map(Arc::clone) else {
            return Ok(());
        };
        let value = match update.into() {
            Update::Set(value) => Some(value),
            Update::With(mapper) => {
                let current = match self.store.get_value(value_id) {
                    Some(scalar) => Some(codec.decode(&scalar)?),
                    None => None,
                };
                mapper(current)
            }
        };
        let encoded = match value {
            Some(value) => encode_field(&codec, &value, || value_path(value_id))?,
            None => None,
        };
        match encoded {
            Some(scalar) => self.store.set_value(value_id, scalar.into()),
            None => self.store.del_value(value_id),
        }
        Ok(())
    }

    /// Replace declared tables and declared values together, as one
    /// underlying transaction.
    pub fn set_content(&mut self, tables: AppTables, values: AppValues) -> Result<(), Error> {
        // Encode both halves before the first write.
        let encoded_tables = encode_tables(&self.schema, &tables)?;
        let mut remaining = values;
        let mut encoded_values = Vec::new();
        for value_id in self.schema.value_ids() {
            let scalar = match remaining.remove(value_id) {
                Some(value) => {
                    let codec = self.schema.require_value_codec(value_id)?;
                    encode_field(codec, &value, || value_path(value_id))?
                }
                None => None,
            };
            encoded_values.push((value_id.to_string(), scalar));
        }
        let mut encoded_tables = encoded_tables;
        let declared_tables: Vec<String> = self.schema.table_ids().map(String::from).collect();
        self.store.start_transaction();
        for table_id in &declared_tables {
            match encoded_tables.remove(table_id) {
                Some(table) => self.store.set_table(table_id, table),
                None => self.store.del_table(table_id),
            }
        }
        for (value_id, scalar) in encoded_values {
            match scalar {
                Some(scalar) => self.store.set_value(&value_id, scalar.into()),
                None => self.store.del_value(&value_id),
            }
        }
        self.store.finish_transaction(None);
        Ok(())
    }

    // --- deletions (direct delegation) ---

    pub fn del_tables(&mut self) {
        self.store.del_tables();
    }

    pub fn del_table(&mut self, table_id: &str) {
        self.store.del_table(table_id);
    }

    pub fn del_row(&mut self, table_id: &str, row_id: &str) {
        self.store.del_row(table_id, row_id);
    }

    pub fn del_cell(&mut self, table_id: &str, row_id: &str, cell_id: &str) {
        self.store.del_cell(table_id, row_id, cell_id);
    }

    pub fn del_values(&mut self) {
        self.store.del_values();
    }

    pub fn del_value(&mut self, value_id: &str) {
        self.store.del_value(value_id);
    }

    // --- existence and identifier passthroughs ---

    pub fn has_tables(&self) -> bool {
        self.store.has_tables()
    }

    pub fn has_table(&self, table_id: &str) -> bool {
        self.store.has_table(table_id)
    }

    pub fn has_row(&self, table_id: &str, row_id: &str) -> bool {
        self.store.has_row(table_id, row_id)
    }

    pub fn has_cell(&self, table_id: &str, row_id: &str, cell_id: &str) -> bool {
        self.store.has_cell(table_id, row_id, cell_id)
    }

    pub fn has_values(&self) -> bool {
        self.store.has_values()
    }

    pub fn has_value(&self, value_id: &str) -> bool {
        self.store.has_value(value_id)
    }

    pub fn get_table_ids(&self) -> Vec<String> {
        self.store.get_table_ids()
    }

    pub fn get_row_ids(&self, table_id: &str) -> Vec<String> {
        self.store.get_row_ids(table_id)
    }

    pub fn get_cell_ids(&self, table_id: &str, row_id: &str) -> Vec<String> {
        self.store.get_cell_ids(table_id, row_id)
    }

    pub fn get_table_cell_ids(&self, table_id: &str) -> Vec<String> {
        self.store.get_table_cell_ids(table_id)
    }

    /// Ids of stored values, filtered down to the declared ones.
    pub fn get_value_ids(&self) -> Vec<String> {
        self.store
            .get_value_ids()
            .into_iter()
            .filter(|id| self.schema.value_codec(id).is_some())
            .collect()
    }

    pub fn get_sorted_row_ids(
        &self,
        table_id: &str,
        cell_id: Option<&str>,
        descending: bool,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<String> {
        self.store
            .get_sorted_row_ids(table_id, cell_id, descending, offset, limit)
    }

    pub fn get_sorted_row_ids_with(&self, args: &SortedRowIdsArgs) -> Vec<String> {
        self.store.get_sorted_row_ids_with(args)
    }

    /// Whole-store JSON, straight from the underlying store: raw scalars,
    /// not decoded values.
    pub fn get_json(&self) -> String {
        self.store.get_json()
    }

    /// Whole-store JSON import, straight to the underlying store.
    pub fn set_json(&mut self, json: &str) {
        self.store.set_json(json);
    }

    // --- transactions ---

    pub fn start_transaction(&mut self) {
        self.store.start_transaction();
    }

    pub fn finish_transaction(
        &mut self,
        rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>,
    ) {
        self.store.finish_transaction(rollback);
    }

    /// Run `actions` inside one underlying transaction frame; listeners
    /// observe the net effect once. The block receives a typed view over
    /// the same store and schema.
    pub fn transaction<R>(
        &mut self,
        actions: impl FnOnce(&mut TypedStore<&mut S>) -> R,
        rollback: Option<&mut dyn FnMut(&dyn Store) -> bool>,
    ) -> R {
        self.store.start_transaction();
        let mut view = TypedStore {
            store: &mut self.store,
            schema: Arc::clone(&self.schema),
        };
        let result = actions(&mut view);
        self.store.finish_transaction(rollback);
        result
    }

    // --- listener handle passthroughs ---

    pub fn del_listener(&mut self, listener_id: tabstore_core::ListenerId) {
        self.store.del_listener(listener_id);
    }

    /// Force-invoke a listener with the current state.
    pub fn call_listener(&mut self, listener_id: tabstore_core::ListenerId) {
        self.store.call_listener(listener_id);
    }
}

// Spot-check helpers live here; behavior-level coverage is in the
// integration tests.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::PlainCodec;
    use crate::schema::Shape;
    use tabstore_core::Scalar;
    use tabstore_mem::MemStore;

    fn store() -> TypedStore<MemStore> {
        TypedStore::new(
            MemStore::new(),
            Schema::new()
                .table("t", Shape::new().field("c", PlainCodec))
                .values(Shape::new().field("v", PlainCodec)),
        )
    }

    #[test]
    fn update_from_literals() {
        let mut ts = store();
        ts.set_value("v", "hello").unwrap();
        assert_eq!(ts.get_value("v").unwrap(), Some(Value::from("hello")));
        ts.set_value("v", 3i64).unwrap();
        assert_eq!(ts.get_value("v").unwrap(), Some(Value::Float(3.0)));
    }

    #[test]
    fn mapper_observes_decoded_current_value() {
        let mut ts = store();
        ts.set_value("v", 1i64).unwrap();
        ts.set_value(
            "v",
            Update::with(|current| {
                let n = current.and_then(|v| v.as_f64()).unwrap_or(0.0);
                Some(Value::Float(n + 1.0))
            }),
        )
        .unwrap();
        assert_eq!(ts.get_value("v").unwrap(), Some(Value::Float(2.0)));
    }

    #[test]
    fn mapper_returning_none_deletes() {
        let mut ts = store();
        ts.set_value("v", 1i64).unwrap();
        ts.set_value("v", Update::with(|_| None)).unwrap();
        assert!(!ts.has_value("v"));
    }

    #[test]
    fn undeclared_value_write_is_a_silent_noop() {
        let mut ts = store();
        ts.set_value("undeclared", 1i64).unwrap();
        assert!(!ts.has_value("undeclared"));
        assert_eq!(ts.get_value("undeclared").unwrap(), None);
    }

    #[test]
    fn get_value_ids_filters_to_declared() {
        let mut ts = store();
        ts.set_value("v", 1i64).unwrap();
        // Write an undeclared value behind the facade's back.
        ts.store
            .set_value("raw", tabstore_core::ScalarUpdate::Set(Scalar::from(1.0)));
        assert_eq!(ts.get_value_ids(), vec!["v".to_string()]);
        assert!(ts.store.has_value("raw"));
    }

    #[test]
    fn transaction_view_is_typed() {
        let mut ts = store();
        ts.transaction(
            |view| {
                view.set_row(
                    "t",
                    "r",
                    AppRow::from([("c".to_string(), Value::from("x"))]),
                )
                .unwrap();
            },
            None,
        );
        assert_eq!(
            ts.get_cell("t", "r", "c").unwrap(),
            Some(Value::from("x"))
        );
    }
}
