//! Content types: rows, tables, values, id filters and sorted-row-id queries.

use std::collections::BTreeMap;

use crate::Scalar;

/// A row: cell ids mapped to stored scalars.
pub type Row = BTreeMap<String, Scalar>;

/// A table: row ids mapped to rows.
pub type Table = BTreeMap<String, Row>;

/// The tabular half of a store: table ids mapped to tables.
pub type Tables = BTreeMap<String, Table>;

/// The flat half of a store: value ids mapped to stored scalars.
pub type Values = BTreeMap<String, Scalar>;

/// Added/removed id deltas delivered to id-diff listeners.
///
/// `+1` marks an id that appeared, `-1` one that disappeared.
pub type IdChanges = BTreeMap<String, i8>;

/// A listener registration filter: one specific id, or any id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdFilter {
    /// Match exactly this id.
    Id(String),
    /// Match every id at this position (the wildcard).
    Any,
}

impl IdFilter {
    /// Check whether a concrete id passes this filter.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            IdFilter::Id(want) => want == id,
            IdFilter::Any => true,
        }
    }
}

impl From<&str> for IdFilter {
    fn from(id: &str) -> Self {
        IdFilter::Id(id.to_string())
    }
}

impl From<String> for IdFilter {
    fn from(id: String) -> Self {
        IdFilter::Id(id)
    }
}

/// The options-object form of a sorted-row-id query.
///
/// Equivalent to the positional arguments of
/// [`Store::get_sorted_row_ids`](crate::Store::get_sorted_row_ids); callers
/// that prefer naming their options build one of these instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedRowIdsArgs {
    /// The table to query.
    pub table_id: String,
    /// Sort by this cell's value; `None` sorts by row id.
    pub cell_id: Option<String>,
    /// Reverse the sort order.
    pub descending: bool,
    /// Skip this many leading row ids.
    pub offset: usize,
    /// Cap the result length; `None` is unlimited.
    pub limit: Option<usize>,
}

impl SortedRowIdsArgs {
    /// Query a table sorted by row id, ascending, unlimited.
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            cell_id: None,
            descending: false,
            offset: 0,
            limit: None,
        }
    }

    /// Sort by a cell's value instead of the row id.
    pub fn by_cell(mut self, cell_id: impl Into<String>) -> Self {
        self.cell_id = Some(cell_id.into());
        self
    }

    /// Reverse the sort order.
    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    /// Skip leading row ids.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Cap the result length.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches() {
        assert!(IdFilter::Any.matches("anything"));
        assert!(IdFilter::from("users").matches("users"));
        assert!(!IdFilter::from("users").matches("pets"));
    }

    #[test]
    fn sorted_args_builder() {
        let args = SortedRowIdsArgs::new("users")
            .by_cell("age")
            .descending(true)
            .offset(2)
            .limit(10);
        assert_eq!(args.table_id, "users");
        assert_eq!(args.cell_id.as_deref(), Some("age"));
        assert!(args.descending);
        assert_eq!(args.offset, 2);
        assert_eq!(args.limit, Some(10));
    }
}
