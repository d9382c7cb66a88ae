use std::cell::RefCell;
use std::rc::Rc;

use tabstore_core::{IdFilter, Scalar, Store};
use tabstore_mem::MemStore;
use tabstore_typed::{
    AppRow, AppTable, AppTables, AppValues, BigIntCodec, Error, IsoDateCodec, JsonCodec,
    PlainCodec, Schema, Shape, TypedStore, Update, Value,
};

fn schema() -> Schema {
    Schema::new()
        .table(
            "users",
            Shape::new()
                .field("name", PlainCodec)
                .field("prefs", JsonCodec)
                .field("seen", IsoDateCodec),
        )
        .table("plain", Shape::new().field("n", PlainCodec))
        .values(
            Shape::new()
                .field("open", PlainCodec)
                .field("big", BigIntCodec),
        )
}

fn row(pairs: &[(&str, Value)]) -> AppRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn obj(pairs: &[(&str, Value)]) -> Value {
    Value::Map(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

#[test]
fn test_structured_field_stores_json_text() {
    let mut raw = MemStore::new();
    let mut ts = TypedStore::new(&mut raw, schema());

    ts.set_row(
        "users",
        "1",
        row(&[
            ("name", Value::from("s")),
            ("prefs", obj(&[("s", Value::from("x"))])),
        ]),
    )
    .unwrap();

    assert_eq!(
        ts.get_cell("users", "1", "prefs").unwrap(),
        Some(obj(&[("s", Value::from("x"))]))
    );

    drop(ts);
    // The underlying cell is the literal JSON text.
    assert_eq!(
        raw.get_cell("users", "1", "prefs"),
        Some(Scalar::from(r#"{"s":"x"}"#))
    );
}

#[test]
fn test_bigint_value_roundtrips_exactly() {
    let mut raw = MemStore::new();
    let mut ts = TypedStore::new(&mut raw, schema());

    // 2^53 + 1: not representable as f64.
    ts.set_value("big", Value::BigInt(9_007_199_254_740_993))
        .unwrap();

    assert_eq!(
        ts.get_value("big").unwrap(),
        Some(Value::BigInt(9_007_199_254_740_993))
    );

    drop(ts);
    assert_eq!(
        raw.get_value("big"),
        Some(Scalar::from("9007199254740993"))
    );
}

#[test]
fn test_non_scalar_encode_fails_with_path() {
    let mut ts = TypedStore::new(MemStore::new(), schema());

    // A plain field whose value is structured fails the guard.
    let result = ts.set_row("users", "1", row(&[("name", obj(&[]))]));
    match result {
        Err(Error::StorageType { path, type_name }) => {
            assert_eq!(path, "tables.users.1.name");
            assert_eq!(type_name, "map");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // The failed write left nothing behind.
    assert!(!ts.has_table("users"));
}

#[test]
fn test_absent_encode_deletes_instead_of_writing() {
    let mut ts = TypedStore::new(MemStore::new(), schema());

    // Null under IsoDateCodec encodes to absence, so only name survives.
    ts.set_row(
        "users",
        "1",
        row(&[("name", Value::from("x")), ("seen", Value::Null)]),
    )
    .unwrap();
    assert_eq!(ts.get_cell_ids("users", "1"), vec!["name".to_string()]);

    // A mapper returning None deletes the value outright.
    ts.set_value("big", Value::BigInt(1)).unwrap();
    ts.set_value("big", Update::with(|_| None)).unwrap();
    assert!(!ts.has_value("big"));
}

#[test]
fn test_set_cell_requires_existing_row() {
    let mut ts = TypedStore::new(MemStore::new(), schema());

    let result = ts.set_cell("users", "missing", "name", "x");
    assert!(matches!(result, Err(Error::MissingRow { .. })));
    assert!(!ts.has_row("users", "missing"));

    // After a full-row write the cell path works.
    ts.set_row("users", "1", row(&[("name", Value::from("a"))]))
        .unwrap();
    ts.set_cell("users", "1", "name", "b").unwrap();
    assert_eq!(
        ts.get_cell("users", "1", "name").unwrap(),
        Some(Value::from("b"))
    );
}

#[test]
fn test_unknown_id_tolerance_is_asymmetric() {
    let mut raw = MemStore::new();
    raw.set_cell(
        "undeclared",
        "r",
        "c",
        tabstore_core::ScalarUpdate::Set(Scalar::from(1.0)),
    );
    let mut ts = TypedStore::new(&mut raw, schema());

    // Bulk reads skip undeclared storage without raising.
    assert!(!ts.get_tables().unwrap().contains_key("undeclared"));

    // Bulk writes skip undeclared input and leave undeclared storage alone.
    let mut tables = AppTables::new();
    tables.insert(
        "plain".to_string(),
        AppTable::from([("r".to_string(), row(&[("n", Value::from(1.0))]))]),
    );
    tables.insert("alien".to_string(), AppTable::new());
    ts.set_tables(tables).unwrap();

    // Single-entity paths are strict.
    assert!(matches!(
        ts.get_table("undeclared"),
        Err(Error::UnknownTable(_))
    ));
    assert!(matches!(
        ts.set_row("users", "1", row(&[("bogus", Value::from(1.0))])),
        Err(Error::UnknownCell { .. })
    ));

    // Values go the other way: unknown single ids are silent.
    ts.set_value("unknown", 1i64).unwrap();
    assert_eq!(ts.get_value("unknown").unwrap(), None);

    drop(ts);
    assert!(raw.has_table("undeclared"));
    assert!(!raw.has_value("unknown"));
}

#[test]
fn test_declared_tables_missing_from_set_tables_are_deleted() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    ts.set_row("plain", "r", row(&[("n", Value::from(1.0))]))
        .unwrap();

    let mut tables = AppTables::new();
    tables.insert(
        "users".to_string(),
        AppTable::from([("1".to_string(), row(&[("name", Value::from("a"))]))]),
    );
    ts.set_tables(tables).unwrap();

    assert!(ts.has_table("users"));
    assert!(!ts.has_table("plain"));
}

#[test]
fn test_cell_listener_sees_decoded_old_and_new() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    let seen: Rc<RefCell<Vec<(Option<Value>, Option<Value>)>>> = Rc::new(RefCell::new(Vec::new()));
    let seen2 = Rc::clone(&seen);

    ts.add_cell_listener(
        IdFilter::from("users"),
        IdFilter::Any,
        IdFilter::from("prefs"),
        false,
        move |_store, _t, _r, _c, new, old, _lookup| {
            seen2.borrow_mut().push((new.cloned(), old.cloned()));
        },
    );

    ts.set_row("users", "1", row(&[("prefs", obj(&[("k", Value::Int(1))]))]))
        .unwrap();
    ts.set_cell("users", "1", "prefs", obj(&[("k", Value::Int(2))]))
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (Some(obj(&[("k", Value::Int(1))])), None));
    assert_eq!(
        seen[1],
        (
            Some(obj(&[("k", Value::Int(2))])),
            Some(obj(&[("k", Value::Int(1))]))
        )
    );
}

#[test]
fn test_transaction_batches_listener_to_net_change() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    ts.set_row("plain", "r", row(&[("n", Value::from(0.0))]))
        .unwrap();

    let seen: Rc<RefCell<Vec<(Option<Value>, Option<Value>)>>> = Rc::new(RefCell::new(Vec::new()));
    let seen2 = Rc::clone(&seen);
    ts.add_cell_listener(
        IdFilter::from("plain"),
        IdFilter::Any,
        IdFilter::from("n"),
        false,
        move |_store, _t, _r, _c, new, old, _lookup| {
            seen2.borrow_mut().push((new.cloned(), old.cloned()));
        },
    );

    ts.transaction(
        |view| {
            view.set_cell("plain", "r", "n", 1.0).unwrap();
            view.set_cell("plain", "r", "n", 2.0).unwrap();
        },
        None,
    );

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        (Some(Value::Float(2.0)), Some(Value::Float(0.0)))
    );
}

#[test]
fn test_rollback_reverts_facade_writes() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    ts.set_row("plain", "r", row(&[("n", Value::from(1.0))]))
        .unwrap();

    ts.transaction(
        |view| {
            view.set_cell("plain", "r", "n", 9.0).unwrap();
        },
        Some(&mut |_store: &dyn Store| true),
    );

    assert_eq!(
        ts.get_cell("plain", "r", "n").unwrap(),
        Some(Value::Float(1.0))
    );
}

#[test]
fn test_mutator_listener_writes_before_non_mutator_observes() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let order_m = Rc::clone(&order);
    ts.add_cell_listener(
        IdFilter::from("plain"),
        IdFilter::Any,
        IdFilter::from("n"),
        true,
        move |store, t, r, _c, new, _old, _lookup| {
            order_m.borrow_mut().push("mutator");
            if new != Some(&Value::Float(99.0)) {
                store.set_cell(t, r, "n", 99.0).unwrap();
            }
        },
    );
    let order_n = Rc::clone(&order);
    ts.add_cell_listener(
        IdFilter::from("plain"),
        IdFilter::Any,
        IdFilter::from("n"),
        false,
        move |store, t, r, c, _new, _old, _lookup| {
            order_n.borrow_mut().push("non-mutator");
            assert_eq!(store.get_cell(t, r, c).unwrap(), Some(Value::Float(99.0)));
        },
    );

    ts.set_row("plain", "r", row(&[("n", Value::from(1.0))]))
        .unwrap();

    assert_eq!(*order.borrow(), vec!["mutator", "non-mutator"]);
}

#[test]
fn test_set_partial_row_merges_without_creating() {
    let mut ts = TypedStore::new(MemStore::new(), schema());

    assert!(matches!(
        ts.set_partial_row("users", "1", row(&[("name", Value::from("a"))])),
        Err(Error::MissingRow { .. })
    ));

    ts.set_row(
        "users",
        "1",
        row(&[
            ("name", Value::from("a")),
            ("prefs", obj(&[("k", Value::Int(1))])),
        ]),
    )
    .unwrap();
    ts.set_partial_row("users", "1", row(&[("name", Value::from("b"))]))
        .unwrap();

    let merged = ts.require_row("users", "1").unwrap();
    assert_eq!(merged.get("name"), Some(&Value::from("b")));
    assert_eq!(merged.get("prefs"), Some(&obj(&[("k", Value::Int(1))])));
}

#[test]
fn test_set_content_writes_both_halves_in_one_round() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    let rounds = Rc::new(RefCell::new(0usize));

    let rounds_t = Rc::clone(&rounds);
    ts.add_tables_listener(false, move |_store, _lookup| {
        *rounds_t.borrow_mut() += 1;
    });
    let rounds_v = Rc::clone(&rounds);
    ts.add_values_listener(false, move |_store, _lookup| {
        *rounds_v.borrow_mut() += 1;
    });

    let tables = AppTables::from([(
        "plain".to_string(),
        AppTable::from([("r".to_string(), row(&[("n", Value::from(1.0))]))]),
    )]);
    let values = AppValues::from([("open".to_string(), Value::from(true))]);
    ts.set_content(tables, values).unwrap();

    assert_eq!(ts.get_cell("plain", "r", "n").unwrap(), Some(Value::Float(1.0)));
    assert_eq!(ts.get_value("open").unwrap(), Some(Value::Bool(true)));
    // One dispatch round: each listener fired once.
    assert_eq!(*rounds.borrow(), 2);
}

#[test]
fn test_codec_roundtrip_through_every_prebuilt() {
    let schema = Schema::new().values(
        Shape::new()
            .field("plain", PlainCodec)
            .field("json", JsonCodec)
            .field("iso", IsoDateCodec)
            .field("big", BigIntCodec),
    );
    let mut ts = TypedStore::new(MemStore::new(), schema);

    let t = chrono::DateTime::from_timestamp(1_717_243_845, 0).unwrap();
    ts.set_value("plain", Value::from("s")).unwrap();
    ts.set_value("json", obj(&[("a", Value::Array(vec![Value::Int(1)]))]))
        .unwrap();
    ts.set_value("iso", Value::Time(t)).unwrap();
    ts.set_value("big", Value::BigInt(i128::from(i64::MAX) * 2))
        .unwrap();

    assert_eq!(ts.get_value("plain").unwrap(), Some(Value::from("s")));
    assert_eq!(
        ts.get_value("json").unwrap(),
        Some(obj(&[("a", Value::Array(vec![Value::Int(1)]))]))
    );
    assert_eq!(ts.get_value("iso").unwrap(), Some(Value::Time(t)));
    assert_eq!(
        ts.get_value("big").unwrap(),
        Some(Value::BigInt(i128::from(i64::MAX) * 2))
    );
}

#[test]
fn test_json_import_export_passes_through_raw() {
    let mut ts = TypedStore::new(MemStore::new(), schema());
    ts.set_row("plain", "r", row(&[("n", Value::from(1.0))]))
        .unwrap();
    ts.set_value("open", Value::from(true)).unwrap();

    let json = ts.get_json();
    let mut other = TypedStore::new(MemStore::new(), schema());
    other.set_json(&json);

    assert_eq!(other.get_cell("plain", "r", "n").unwrap(), Some(Value::Float(1.0)));
    assert_eq!(other.get_value("open").unwrap(), Some(Value::Bool(true)));
}
