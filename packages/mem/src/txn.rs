//! Transaction change tracking.
//!
//! While a transaction is open, every cell and value write records a
//! `(first old, latest new)` pair. When the outermost frame finishes, the
//! pairs are reduced to net changes (entries whose old and new differ) and
//! the structural deltas - added/removed rows, tables, values - are derived
//! from the net changes plus the post-transaction state.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use tabstore_core::{IdChanges, Scalar, Tables, Values};

pub(crate) type CellKey = (String, String, String);

/// Raw accumulated writes: first old value, latest new value, per slot.
#[derive(Default)]
pub(crate) struct ChangeSet {
    pub(crate) cells: BTreeMap<CellKey, (Option<Scalar>, Option<Scalar>)>,
    pub(crate) values: BTreeMap<String, (Option<Scalar>, Option<Scalar>)>,
}

impl ChangeSet {
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.values.is_empty()
    }

    pub(crate) fn record_cell(
        &mut self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
        old: Option<Scalar>,
        new: Option<Scalar>,
    ) {
        let key = (table_id.to_string(), row_id.to_string(), cell_id.to_string());
        match self.cells.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().1 = new,
            Entry::Vacant(e) => {
                e.insert((old, new));
            }
        }
    }

    pub(crate) fn record_value(&mut self, value_id: &str, old: Option<Scalar>, new: Option<Scalar>) {
        match self.values.entry(value_id.to_string()) {
            Entry::Occupied(mut e) => e.get_mut().1 = new,
            Entry::Vacant(e) => {
                e.insert((old, new));
            }
        }
    }

    /// Compose with writes that happened after this set was captured,
    /// keeping the earliest old and the latest new per slot.
    pub(crate) fn merge(mut self, later: ChangeSet) -> ChangeSet {
        for (key, (old, new)) in later.cells {
            match self.cells.entry(key) {
                Entry::Occupied(mut e) => e.get_mut().1 = new,
                Entry::Vacant(e) => {
                    e.insert((old, new));
                }
            }
        }
        for (key, (old, new)) in later.values {
            match self.values.entry(key) {
                Entry::Occupied(mut e) => e.get_mut().1 = new,
                Entry::Vacant(e) => {
                    e.insert((old, new));
                }
            }
        }
        self
    }
}

/// The net effect of a finished transaction, as listeners observe it.
///
/// Derived from a [`ChangeSet`] plus the post-transaction state: slots whose
/// old and new coincide are dropped, and existence deltas at every level are
/// reconstructed by un-applying the net changes.
#[derive(Default)]
pub(crate) struct NetChanges {
    pub(crate) cells: Vec<(String, String, String, Option<Scalar>, Option<Scalar>)>,
    pub(crate) values: Vec<(String, Option<Scalar>, Option<Scalar>)>,
    pub(crate) changed_tables: BTreeSet<String>,
    pub(crate) changed_rows: BTreeSet<(String, String)>,
    pub(crate) table_ids: IdChanges,
    pub(crate) row_ids: BTreeMap<String, IdChanges>,
    pub(crate) cell_ids: BTreeMap<(String, String), IdChanges>,
    pub(crate) value_ids: IdChanges,
    pub(crate) had_tables: bool,
    pub(crate) now_has_tables: bool,
    pub(crate) had_values: bool,
    pub(crate) now_has_values: bool,
}

impl NetChanges {
    pub(crate) fn compute(tables: &Tables, values: &Values, changes: &ChangeSet) -> Self {
        let mut net = NetChanges::default();

        for ((t, r, c), (old, new)) in &changes.cells {
            if old == new {
                continue;
            }
            net.changed_tables.insert(t.clone());
            net.changed_rows.insert((t.clone(), r.clone()));
            match (old.is_some(), new.is_some()) {
                (false, true) => {
                    net.cell_ids
                        .entry((t.clone(), r.clone()))
                        .or_default()
                        .insert(c.clone(), 1);
                }
                (true, false) => {
                    net.cell_ids
                        .entry((t.clone(), r.clone()))
                        .or_default()
                        .insert(c.clone(), -1);
                }
                _ => {}
            }
            net.cells
                .push((t.clone(), r.clone(), c.clone(), old.clone(), new.clone()));
        }

        // Row existence: a row's pre-transaction cell set is its current one
        // with added cells removed and removed cells restored.
        for (t, r) in &net.changed_rows {
            let post: BTreeSet<String> = tables
                .get(t)
                .and_then(|table| table.get(r))
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default();
            let mut pre = post.clone();
            if let Some(deltas) = net.cell_ids.get(&(t.clone(), r.clone())) {
                for (c, d) in deltas {
                    if *d > 0 {
                        pre.remove(c);
                    } else {
                        pre.insert(c.clone());
                    }
                }
            }
            if pre.is_empty() != post.is_empty() {
                net.row_ids
                    .entry(t.clone())
                    .or_default()
                    .insert(r.clone(), if pre.is_empty() { 1 } else { -1 });
            }
        }

        // Table existence, same reconstruction one level up.
        for t in &net.changed_tables {
            let post: BTreeSet<String> = tables
                .get(t)
                .map(|table| table.keys().cloned().collect())
                .unwrap_or_default();
            let mut pre = post.clone();
            if let Some(deltas) = net.row_ids.get(t) {
                for (r, d) in deltas {
                    if *d > 0 {
                        pre.remove(r);
                    } else {
                        pre.insert(r.clone());
                    }
                }
            }
            if pre.is_empty() != post.is_empty() {
                net.table_ids
                    .insert(t.clone(), if pre.is_empty() { 1 } else { -1 });
            }
        }

        for (v, (old, new)) in &changes.values {
            if old == new {
                continue;
            }
            match (old.is_some(), new.is_some()) {
                (false, true) => {
                    net.value_ids.insert(v.clone(), 1);
                }
                (true, false) => {
                    net.value_ids.insert(v.clone(), -1);
                }
                _ => {}
            }
            net.values.push((v.clone(), old.clone(), new.clone()));
        }

        net.now_has_tables = !tables.is_empty();
        let mut pre_tables: BTreeSet<&String> = tables.keys().collect();
        for (t, d) in &net.table_ids {
            if *d > 0 {
                pre_tables.remove(t);
            } else {
                pre_tables.insert(t);
            }
        }
        net.had_tables = !pre_tables.is_empty();

        net.now_has_values = !values.is_empty();
        let mut pre_values: BTreeSet<&String> = values.keys().collect();
        for (v, d) in &net.value_ids {
            if *d > 0 {
                pre_values.remove(v);
            } else {
                pre_values.insert(v);
            }
        }
        net.had_values = !pre_values.is_empty();

        net
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.values.is_empty()
    }

    pub(crate) fn find_cell(
        &self,
        table_id: &str,
        row_id: &str,
        cell_id: &str,
    ) -> Option<(&Option<Scalar>, &Option<Scalar>)> {
        self.cells
            .iter()
            .find(|(t, r, c, _, _)| t == table_id && r == row_id && c == cell_id)
            .map(|(_, _, _, old, new)| (old, new))
    }

    pub(crate) fn find_value(&self, value_id: &str) -> Option<(&Option<Scalar>, &Option<Scalar>)> {
        self.values
            .iter()
            .find(|(v, _, _)| v == value_id)
            .map(|(_, old, new)| (old, new))
    }
}
