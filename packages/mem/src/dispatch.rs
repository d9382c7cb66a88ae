//! Listener registry and change dispatch.
//!
//! Dispatch happens when the outermost transaction frame finishes. It runs
//! in two phases: mutator listeners first, then non-mutator listeners.
//! Writes made by mutator listeners fold into the round's change set, so
//! non-mutator listeners observe the merged net effect, once.

use std::cell::RefCell;
use std::rc::Rc;

use tabstore_core::{
    CellIdsListener, CellListener, HasCellListener, HasListener, HasRowListener,
    HasTableListener, HasValueListener, IdChanges, IdFilter, ListenerId, RowIdsListener,
    RowListener, SortedRowIdsArgs, SortedRowIdsListener, Store, TableIdsListener,
    TableListener, TablesListener, ValueIdsListener, ValueListener, ValuesListener,
};

use crate::txn::{ChangeSet, NetChanges};
use crate::MemStore;

/// A registered listener: its filters plus its callback. The sorted-row-id
/// variant additionally caches the query's last known result so it only
/// fires when the result actually changes.
pub(crate) enum Listener {
    Tables(TablesListener),
    TableIds(TableIdsListener),
    Table(IdFilter, TableListener),
    RowIds(IdFilter, RowIdsListener),
    SortedRowIds(SortedRowIdsArgs, Vec<String>, SortedRowIdsListener),
    Row(IdFilter, IdFilter, RowListener),
    CellIds(IdFilter, IdFilter, CellIdsListener),
    Cell(IdFilter, IdFilter, IdFilter, CellListener),
    HasTables(HasListener),
    HasTable(IdFilter, HasTableListener),
    HasRow(IdFilter, IdFilter, HasRowListener),
    HasCell(IdFilter, IdFilter, IdFilter, HasCellListener),
    Values(ValuesListener),
    ValueIds(ValueIdsListener),
    Value(IdFilter, ValueListener),
    HasValues(HasListener),
    HasValue(IdFilter, HasValueListener),
}

impl Listener {
    /// Firing order within a dispatch phase: coarse tabular kinds first,
    /// then rows and cells, then existence transitions, then values.
    fn rank(&self) -> u8 {
        match self {
            Listener::Tables(_) => 0,
            Listener::TableIds(_) => 1,
            Listener::Table(..) => 2,
            Listener::RowIds(..) => 3,
            Listener::SortedRowIds(..) => 4,
            Listener::Row(..) => 5,
            Listener::CellIds(..) => 6,
            Listener::Cell(..) => 7,
            Listener::HasTables(_) => 8,
            Listener::HasTable(..) => 9,
            Listener::HasRow(..) => 10,
            Listener::HasCell(..) => 11,
            Listener::Values(_) => 12,
            Listener::ValueIds(_) => 13,
            Listener::Value(..) => 14,
            Listener::HasValues(_) => 15,
            Listener::HasValue(..) => 16,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) id: ListenerId,
    pub(crate) mutator: bool,
    pub(crate) listener: Rc<RefCell<Listener>>,
}

/// Registration-ordered listener registry. Listeners are held behind
/// `Rc<RefCell<..>>` so a dispatch round can keep firing a consistent
/// snapshot even if callbacks add or remove listeners mid-round.
pub(crate) struct Registry {
    entries: Vec<Entry>,
    next_id: ListenerId,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn add(&mut self, mutator: bool, listener: Listener) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            mutator,
            listener: Rc::new(RefCell::new(listener)),
        });
        log::trace!("listener {} registered (mutator: {})", id, mutator);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) {
        self.entries.retain(|e| e.id != id);
    }

    pub(crate) fn find(&self, id: ListenerId) -> Option<Entry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    /// The entries to fire, sorted by kind rank; registration order breaks
    /// ties (the sort is stable).
    fn snapshot(&self) -> Vec<Entry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.listener.borrow().rank());
        entries
    }
}

impl MemStore {
    pub(crate) fn dispatch(&mut self, changes: ChangeSet) {
        self.dispatching = true;
        let net = NetChanges::compute(&self.tables, &self.values, &changes);
        if !net.is_empty() {
            self.fire_phase(true, &net);
        }
        // Fold in whatever the mutator listeners wrote.
        let extra = std::mem::take(&mut self.changes);
        let net = if extra.is_empty() {
            net
        } else {
            let merged = changes.merge(extra);
            NetChanges::compute(&self.tables, &self.values, &merged)
        };
        if !net.is_empty() {
            self.fire_phase(false, &net);
        }
        self.dispatching = false;
    }

    fn fire_phase(&mut self, mutator: bool, net: &NetChanges) {
        let entries = self.registry.snapshot();
        let tables_snapshot = self.tables.clone();
        let values_snapshot = self.values.clone();

        let cell_lookup = |t: &str, r: &str, c: &str| match net.find_cell(t, r, c) {
            Some((old, new)) => (true, old.clone(), new.clone()),
            None => {
                let current = tables_snapshot
                    .get(t)
                    .and_then(|table| table.get(r))
                    .and_then(|row| row.get(c))
                    .cloned();
                (false, current.clone(), current)
            }
        };
        let value_lookup = |v: &str| match net.find_value(v) {
            Some((old, new)) => (true, old.clone(), new.clone()),
            None => {
                let current = values_snapshot.get(v).cloned();
                (false, current.clone(), current)
            }
        };

        for entry in &entries {
            if entry.mutator != mutator {
                continue;
            }
            let rc = Rc::clone(&entry.listener);
            let mut guard = rc.borrow_mut();
            match &mut *guard {
                Listener::Tables(cb) => {
                    if !net.cells.is_empty() {
                        cb(self, &cell_lookup);
                    }
                }
                Listener::TableIds(cb) => {
                    if !net.table_ids.is_empty() {
                        cb(self, &net.table_ids);
                    }
                }
                Listener::Table(filter, cb) => {
                    for t in &net.changed_tables {
                        if filter.matches(t) {
                            cb(self, t, &cell_lookup);
                        }
                    }
                }
                Listener::RowIds(filter, cb) => {
                    for (t, deltas) in &net.row_ids {
                        if filter.matches(t) && !deltas.is_empty() {
                            cb(self, t, deltas);
                        }
                    }
                }
                Listener::SortedRowIds(args, last, cb) => {
                    if net.changed_tables.contains(&args.table_id) {
                        let ids = self.get_sorted_row_ids_with(args);
                        if ids != *last {
                            *last = ids.clone();
                            cb(self, &args.table_id, &ids);
                        }
                    }
                }
                Listener::Row(ft, fr, cb) => {
                    for (t, r) in &net.changed_rows {
                        if ft.matches(t) && fr.matches(r) {
                            cb(self, t, r, &cell_lookup);
                        }
                    }
                }
                Listener::CellIds(ft, fr, cb) => {
                    for ((t, r), deltas) in &net.cell_ids {
                        if ft.matches(t) && fr.matches(r) && !deltas.is_empty() {
                            cb(self, t, r, deltas);
                        }
                    }
                }
                Listener::Cell(ft, fr, fc, cb) => {
                    for (t, r, c, old, new) in &net.cells {
                        if ft.matches(t) && fr.matches(r) && fc.matches(c) {
                            cb(self, t, r, c, new.as_ref(), old.as_ref(), &cell_lookup);
                        }
                    }
                }
                Listener::HasTables(cb) => {
                    if net.had_tables != net.now_has_tables {
                        cb(self, net.now_has_tables);
                    }
                }
                Listener::HasTable(filter, cb) => {
                    for (t, delta) in &net.table_ids {
                        if filter.matches(t) {
                            cb(self, t, *delta > 0);
                        }
                    }
                }
                Listener::HasRow(ft, fr, cb) => {
                    for (t, deltas) in &net.row_ids {
                        if ft.matches(t) {
                            for (r, delta) in deltas {
                                if fr.matches(r) {
                                    cb(self, t, r, *delta > 0);
                                }
                            }
                        }
                    }
                }
                Listener::HasCell(ft, fr, fc, cb) => {
                    for ((t, r), deltas) in &net.cell_ids {
                        if ft.matches(t) && fr.matches(r) {
                            for (c, delta) in deltas {
                                if fc.matches(c) {
                                    cb(self, t, r, c, *delta > 0);
                                }
                            }
                        }
                    }
                }
                Listener::Values(cb) => {
                    if !net.values.is_empty() {
                        cb(self, &value_lookup);
                    }
                }
                Listener::ValueIds(cb) => {
                    if !net.value_ids.is_empty() {
                        cb(self, &net.value_ids);
                    }
                }
                Listener::Value(filter, cb) => {
                    for (v, old, new) in &net.values {
                        if filter.matches(v) {
                            cb(self, v, new.as_ref(), old.as_ref(), &value_lookup);
                        }
                    }
                }
                Listener::HasValues(cb) => {
                    if net.had_values != net.now_has_values {
                        cb(self, net.now_has_values);
                    }
                }
                Listener::HasValue(filter, cb) => {
                    for (v, delta) in &net.value_ids {
                        if filter.matches(v) {
                            cb(self, v, *delta > 0);
                        }
                    }
                }
            }
        }
    }

    /// `call_listener`: invoke one listener against the current state. The
    /// current value is delivered as the new side with no old side, and the
    /// change lookups report nothing as changed.
    pub(crate) fn invoke_now(&mut self, listener_id: ListenerId) {
        let Some(entry) = self.registry.find(listener_id) else {
            return;
        };
        let tables_snapshot = self.tables.clone();
        let values_snapshot = self.values.clone();
        let no_ids = IdChanges::new();

        let cell_lookup = |t: &str, r: &str, c: &str| {
            let current = tables_snapshot
                .get(t)
                .and_then(|table| table.get(r))
                .and_then(|row| row.get(c))
                .cloned();
            (false, current.clone(), current)
        };
        let value_lookup = |v: &str| {
            let current = values_snapshot.get(v).cloned();
            (false, current.clone(), current)
        };

        let matching_tables = |filter: &IdFilter| -> Vec<String> {
            tables_snapshot
                .keys()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect()
        };

        let mut guard = entry.listener.borrow_mut();
        match &mut *guard {
            Listener::Tables(cb) => cb(self, &cell_lookup),
            Listener::TableIds(cb) => cb(self, &no_ids),
            Listener::Table(filter, cb) => {
                for t in matching_tables(filter) {
                    cb(self, &t, &cell_lookup);
                }
            }
            Listener::RowIds(filter, cb) => {
                for t in matching_tables(filter) {
                    cb(self, &t, &no_ids);
                }
            }
            Listener::SortedRowIds(args, last, cb) => {
                let ids = self.get_sorted_row_ids_with(args);
                *last = ids.clone();
                cb(self, &args.table_id, &ids);
            }
            Listener::Row(ft, fr, cb) => {
                for (t, table) in &tables_snapshot {
                    if ft.matches(t) {
                        for r in table.keys() {
                            if fr.matches(r) {
                                cb(self, t, r, &cell_lookup);
                            }
                        }
                    }
                }
            }
            Listener::CellIds(ft, fr, cb) => {
                for (t, table) in &tables_snapshot {
                    if ft.matches(t) {
                        for r in table.keys() {
                            if fr.matches(r) {
                                cb(self, t, r, &no_ids);
                            }
                        }
                    }
                }
            }
            Listener::Cell(ft, fr, fc, cb) => {
                for (t, table) in &tables_snapshot {
                    if ft.matches(t) {
                        for (r, row) in table {
                            if fr.matches(r) {
                                for (c, current) in row {
                                    if fc.matches(c) {
                                        cb(self, t, r, c, Some(current), None, &cell_lookup);
                                    }
                                }
                            }
                        }
                    }
                }
            }
            Listener::HasTables(cb) => {
                let has = !tables_snapshot.is_empty();
                cb(self, has);
            }
            Listener::HasTable(filter, cb) => {
                for t in matching_tables(filter) {
                    cb(self, &t, true);
                }
            }
            Listener::HasRow(ft, fr, cb) => {
                for (t, table) in &tables_snapshot {
                    if ft.matches(t) {
                        for r in table.keys() {
                            if fr.matches(r) {
                                cb(self, t, r, true);
                            }
                        }
                    }
                }
            }
            Listener::HasCell(ft, fr, fc, cb) => {
                for (t, table) in &tables_snapshot {
                    if ft.matches(t) {
                        for (r, row) in table {
                            if fr.matches(r) {
                                for c in row.keys() {
                                    if fc.matches(c) {
                                        cb(self, t, r, c, true);
                                    }
                                }
                            }
                        }
                    }
                }
            }
            Listener::Values(cb) => cb(self, &value_lookup),
            Listener::ValueIds(cb) => cb(self, &no_ids),
            Listener::Value(filter, cb) => {
                for (v, current) in &values_snapshot {
                    if filter.matches(v) {
                        cb(self, v, Some(current), None, &value_lookup);
                    }
                }
            }
            Listener::HasValues(cb) => {
                let has = !values_snapshot.is_empty();
                cb(self, has);
            }
            Listener::HasValue(filter, cb) => {
                for (v, _) in &values_snapshot {
                    if filter.matches(v) {
                        cb(self, v, true);
                    }
                }
            }
        }
    }
}
