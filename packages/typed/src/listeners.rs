//! Listener registration with decoded payloads.
//!
//! Each method here registers a wrapper around the corresponding underlying
//! listener. The wrapper hands the callback a typed view over the store (so
//! nested calls stay typed), decodes new/old payloads and change-lookup
//! results, and passes identifiers, id-change maps, and the mutator flag
//! through untouched.
//!
//! Decoding is lenient and keyed on the actual changed id, not the
//! registration filter: a wildcard registration can span cells with
//! different codecs, and an id with no declared codec passes its raw scalar
//! through. A codec that fails on a stored scalar also falls back to the
//! raw scalar, with a warning, since a listener has nowhere to return an
//! error to.

use std::sync::Arc;

use tabstore_core::{
    CellChangeLookup, IdChanges, IdFilter, ListenerId, Scalar, SortedRowIdsArgs, Store,
    ValueChangeLookup,
};

use crate::schema::Schema;
use crate::typed::{TypedRef, TypedStore};
use crate::value::Value;

/// Re-derives `(changed, decoded old, decoded new)` for an arbitrary
/// (table, row, cell) id.
pub type CellLookup<'a> = dyn Fn(&str, &str, &str) -> (bool, Option<Value>, Option<Value>) + 'a;

/// Re-derives `(changed, decoded old, decoded new)` for an arbitrary value
/// id.
pub type ValueLookup<'a> = dyn Fn(&str) -> (bool, Option<Value>, Option<Value>) + 'a;

fn decode_cell(schema: &Schema, table_id: &str, cell_id: &str, scalar: &Scalar) -> Value {
    match schema.cell_codec(table_id, cell_id) {
        Some(codec) => match codec.decode(scalar) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "decode failed for cell {table_id}.{cell_id}: {e}; passing raw scalar through"
                );
                Value::from(scalar)
            }
        },
        None => Value::from(scalar),
    }
}

fn decode_value(schema: &Schema, value_id: &str, scalar: &Scalar) -> Value {
    match schema.value_codec(value_id) {
        Some(codec) => match codec.decode(scalar) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "decode failed for value {value_id}: {e}; passing raw scalar through"
                );
                Value::from(scalar)
            }
        },
        None => Value::from(scalar),
    }
}

fn wrap_cell_lookup<'a>(
    schema: &'a Schema,
    lookup: &'a CellChangeLookup<'a>,
) -> impl Fn(&str, &str, &str) -> (bool, Option<Value>, Option<Value>) + 'a {
    move |table_id, row_id, cell_id| {
        let (changed, old, new) = lookup(table_id, row_id, cell_id);
        (
            changed,
            old.map(|s| decode_cell(schema, table_id, cell_id, &s)),
            new.map(|s| decode_cell(schema, table_id, cell_id, &s)),
        )
    }
}

fn wrap_value_lookup<'a>(
    schema: &'a Schema,
    lookup: &'a ValueChangeLookup<'a>,
) -> impl Fn(&str) -> (bool, Option<Value>, Option<Value>) + 'a {
    move |value_id| {
        let (changed, old, new) = lookup(value_id);
        (
            changed,
            old.map(|s| decode_value(schema, value_id, &s)),
            new.map(|s| decode_value(schema, value_id, &s)),
        )
    }
}

impl<S: Store> TypedStore<S> {
    pub fn add_tables_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_tables_listener(
            mutator,
            Box::new(move |store, lookup| {
                let typed_lookup = wrap_cell_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, &typed_lookup);
            }),
        )
    }

    pub fn add_table_ids_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &IdChanges) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_table_ids_listener(
            mutator,
            Box::new(move |store, changes| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, changes);
            }),
        )
    }

    pub fn add_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_table_listener(
            table,
            mutator,
            Box::new(move |store, table_id, lookup| {
                let typed_lookup = wrap_cell_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, &typed_lookup);
            }),
        )
    }

    pub fn add_row_ids_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &IdChanges) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_row_ids_listener(
            table,
            mutator,
            Box::new(move |store, table_id, changes| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, changes);
            }),
        )
    }

    pub fn add_sorted_row_ids_listener(
        &mut self,
        args: SortedRowIdsArgs,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &[String]) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_sorted_row_ids_listener(
            args,
            mutator,
            Box::new(move |store, table_id, ids| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, ids);
            }),
        )
    }

    pub fn add_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &str, &CellLookup<'_>) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_row_listener(
            table,
            row,
            mutator,
            Box::new(move |store, table_id, row_id, lookup| {
                let typed_lookup = wrap_cell_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, row_id, &typed_lookup);
            }),
        )
    }

    pub fn add_cell_ids_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &str, &IdChanges) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_cell_ids_listener(
            table,
            row,
            mutator,
            Box::new(move |store, table_id, row_id, changes| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, row_id, changes);
            }),
        )
    }

    /// Listen to matching cells. The callback receives the decoded new and
    /// old values; decoding follows the changed cell's own codec, so a
    /// wildcard registration spanning differently-typed cells decodes each
    /// one correctly.
    #[allow(clippy::type_complexity)]
    pub fn add_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(
                &mut TypedRef<'_>,
                &str,
                &str,
                &str,
                Option<&Value>,
                Option<&Value>,
                &CellLookup<'_>,
            ) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_cell_listener(
            table,
            row,
            cell,
            mutator,
            Box::new(move |store, table_id, row_id, cell_id, new, old, lookup| {
                let new_value = new.map(|s| decode_cell(&schema, table_id, cell_id, s));
                let old_value = old.map(|s| decode_cell(&schema, table_id, cell_id, s));
                let typed_lookup = wrap_cell_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(
                    &mut typed,
                    table_id,
                    row_id,
                    cell_id,
                    new_value.as_ref(),
                    old_value.as_ref(),
                    &typed_lookup,
                );
            }),
        )
    }

    pub fn add_values_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &ValueLookup<'_>) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_values_listener(
            mutator,
            Box::new(move |store, lookup| {
                let typed_lookup = wrap_value_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, &typed_lookup);
            }),
        )
    }

    pub fn add_value_ids_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &IdChanges) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_value_ids_listener(
            mutator,
            Box::new(move |store, changes| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, changes);
            }),
        )
    }

    /// Listen to matching values, with decoded new/old payloads.
    pub fn add_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, Option<&Value>, Option<&Value>, &ValueLookup<'_>)
            + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_value_listener(
            value,
            mutator,
            Box::new(move |store, value_id, new, old, lookup| {
                let new_value = new.map(|s| decode_value(&schema, value_id, s));
                let old_value = old.map(|s| decode_value(&schema, value_id, s));
                let typed_lookup = wrap_value_lookup(&schema, lookup);
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(
                    &mut typed,
                    value_id,
                    new_value.as_ref(),
                    old_value.as_ref(),
                    &typed_lookup,
                );
            }),
        )
    }

    pub fn add_has_tables_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_tables_listener(
            mutator,
            Box::new(move |store, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, has);
            }),
        )
    }

    pub fn add_has_table_listener(
        &mut self,
        table: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_table_listener(
            table,
            mutator,
            Box::new(move |store, table_id, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, has);
            }),
        )
    }

    pub fn add_has_row_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &str, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_row_listener(
            table,
            row,
            mutator,
            Box::new(move |store, table_id, row_id, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, row_id, has);
            }),
        )
    }

    pub fn add_has_cell_listener(
        &mut self,
        table: IdFilter,
        row: IdFilter,
        cell: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, &str, &str, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_cell_listener(
            table,
            row,
            cell,
            mutator,
            Box::new(move |store, table_id, row_id, cell_id, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, table_id, row_id, cell_id, has);
            }),
        )
    }

    pub fn add_has_values_listener(
        &mut self,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_values_listener(
            mutator,
            Box::new(move |store, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, has);
            }),
        )
    }

    pub fn add_has_value_listener(
        &mut self,
        value: IdFilter,
        mutator: bool,
        mut listener: impl FnMut(&mut TypedRef<'_>, &str, bool) + 'static,
    ) -> ListenerId {
        let schema = Arc::clone(&self.schema);
        self.store.add_has_value_listener(
            value,
            mutator,
            Box::new(move |store, value_id, has| {
                let mut typed = TypedStore::with_schema(store, Arc::clone(&schema));
                listener(&mut typed, value_id, has);
            }),
        )
    }
}
