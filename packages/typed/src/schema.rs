//! Data-model declaration and registry lookups.
//!
//! A [`Schema`] maps table ids to row shapes and declares one shape for the
//! flat global values. It is immutable once built and shared freely across
//! facade instances. Lookups come in two flavors: strict (`require_*`, for
//! single-entity operations, raising on undeclared ids) and lenient
//! (returning `Option`, for bulk operations and listener decode paths).

use std::collections::BTreeMap;
use std::sync::Arc;

use tabstore_core::Scalar;

use crate::error::Error;
use crate::value::Value;

/// A bidirectional transform between an application-level value and a
/// storage-safe one, associated with one cell id or value id.
///
/// `encode` returns `None` to mean absence: the entry is deleted rather
/// than written. The encoded `Some` value is still validated by the scalar
/// guard before it reaches storage, since implementations are free to
/// return anything.
pub trait FieldCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error>;
    fn decode(&self, scalar: &Scalar) -> Result<Value, Error>;
}

/// A structural shape: field id to field codec, in field-id order.
///
/// Used both for a table's rows (fields are cell ids) and for the global
/// values (fields are value ids).
#[derive(Clone, Default)]
pub struct Shape {
    fields: BTreeMap<String, Arc<dyn FieldCodec>>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Builder-style; later declarations of the same id
    /// win.
    pub fn field(mut self, id: impl Into<String>, codec: impl FieldCodec + 'static) -> Self {
        self.fields.insert(id.into(), Arc::new(codec));
        self
    }

    pub fn codec(&self, id: &str) -> Option<&Arc<dyn FieldCodec>> {
        self.fields.get(id)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }
}

/// The immutable data-model declaration a facade is constructed with.
#[derive(Clone, Default)]
pub struct Schema {
    tables: BTreeMap<String, Shape>,
    values: Shape,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table's row shape.
    pub fn table(mut self, table_id: impl Into<String>, shape: Shape) -> Self {
        self.tables.insert(table_id.into(), shape);
        self
    }

    /// Declare the shape of the flat global values.
    pub fn values(mut self, shape: Shape) -> Self {
        self.values = shape;
        self
    }

    // --- strict lookups ---

    pub fn require_row_shape(&self, table_id: &str) -> Result<&Shape, Error> {
        self.tables
            .get(table_id)
            .ok_or_else(|| Error::UnknownTable(table_id.to_string()))
    }

    pub fn require_cell_codec(
        &self,
        table_id: &str,
        cell_id: &str,
    ) -> Result<&Arc<dyn FieldCodec>, Error> {
        self.require_row_shape(table_id)?
            .codec(cell_id)
            .ok_or_else(|| Error::UnknownCell {
                table_id: table_id.to_string(),
                cell_id: cell_id.to_string(),
            })
    }

    pub fn require_value_codec(&self, value_id: &str) -> Result<&Arc<dyn FieldCodec>, Error> {
        self.values
            .codec(value_id)
            .ok_or_else(|| Error::UnknownValue(value_id.to_string()))
    }

    // --- lenient lookups ---

    pub fn row_shape(&self, table_id: &str) -> Option<&Shape> {
        self.tables.get(table_id)
    }

    pub fn cell_codec(&self, table_id: &str, cell_id: &str) -> Option<&Arc<dyn FieldCodec>> {
        self.tables.get(table_id)?.codec(cell_id)
    }

    pub fn value_codec(&self, value_id: &str) -> Option<&Arc<dyn FieldCodec>> {
        self.values.codec(value_id)
    }

    pub fn has_table(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn value_ids(&self) -> impl Iterator<Item = &str> {
        self.values.field_ids()
    }

    pub fn value_shape(&self) -> &Shape {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::PlainCodec;

    fn schema() -> Schema {
        Schema::new()
            .table("pets", Shape::new().field("species", PlainCodec))
            .values(Shape::new().field("open", PlainCodec))
    }

    #[test]
    fn strict_lookups_raise_on_undeclared_ids() {
        let schema = schema();
        assert!(matches!(
            schema.require_row_shape("nope"),
            Err(Error::UnknownTable(_))
        ));
        assert!(matches!(
            schema.require_cell_codec("pets", "nope"),
            Err(Error::UnknownCell { .. })
        ));
        assert!(matches!(
            schema.require_value_codec("nope"),
            Err(Error::UnknownValue(_))
        ));
    }

    #[test]
    fn lenient_lookups_return_none() {
        let schema = schema();
        assert!(schema.cell_codec("pets", "species").is_some());
        assert!(schema.cell_codec("pets", "nope").is_none());
        assert!(schema.cell_codec("nope", "species").is_none());
        assert!(schema.value_codec("open").is_some());
        assert!(schema.value_codec("nope").is_none());
    }

    #[test]
    fn declared_ids_enumerate_in_order() {
        let schema = Schema::new()
            .table("b", Shape::new())
            .table("a", Shape::new());
        let ids: Vec<_> = schema.table_ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
