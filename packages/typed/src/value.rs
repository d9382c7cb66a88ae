//! Application-level values.
//!
//! Storage only ever holds [`Scalar`]s; application code works with this
//! richer tree and relies on field codecs to bridge the two.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tabstore_core::Scalar;

/// A decoded, application-level value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Integers beyond `f64`'s 53-bit exact range. Stored as decimal text.
    BigInt(i128),
    String(String),
    Time(DateTime<Utc>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// A decoded row: cell id to application value.
pub type AppRow = BTreeMap<String, Value>;
/// A decoded table: row id to decoded row.
pub type AppTable = BTreeMap<String, AppRow>;
/// All decoded tables, keyed by table id.
pub type AppTables = BTreeMap<String, AppTable>;
/// All decoded global values, keyed by value id.
pub type AppValues = BTreeMap<String, Value>;

impl Value {
    /// Runtime type tag, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view over both `Int` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::BigInt(i)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::String(s) => Value::String(s),
            Scalar::Number(n) => Value::Float(n),
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Null => Value::Null,
        }
    }
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        scalar.clone().into()
    }
}

/// Convert a `Value` to a `serde_json::Value`.
///
/// Times become RFC 3339 strings; big integers that do not fit `i64` become
/// decimal strings, since plain JSON numbers cannot carry them exactly.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::BigInt(i) => match i64::try_from(i) {
            Ok(small) => serde_json::Value::Number(small.into()),
            Err(_) => serde_json::Value::String(i.to_string()),
        },
        Value::String(s) => serde_json::Value::String(s),
        Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
        Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(value_to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, value_to_json(v))).collect(),
        ),
    }
}

/// Convert a `serde_json::Value` to a `Value`.
///
/// Whole numbers come back as `Int`, everything else numeric as `Float`.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(values) => {
            Value::Array(values.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter().map(|(k, v)| (k, json_to_value(v))).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_preserves_structure() {
        let original = Value::Map(
            [
                ("name".to_string(), Value::from("Alice")),
                ("age".to_string(), Value::Int(30)),
                (
                    "tags".to_string(),
                    Value::Array(vec![Value::from("a"), Value::from("b")]),
                ),
            ]
            .into_iter()
            .collect(),
        );

        let json = value_to_json(original.clone());
        let back = json_to_value(json);

        assert_eq!(back, original);
    }

    #[test]
    fn large_bigint_becomes_decimal_string_in_json() {
        let big = Value::BigInt(170_141_183_460_469_231_731_687_303_715_884_105_727);
        match value_to_json(big) {
            serde_json::Value::String(s) => {
                assert_eq!(s, "170141183460469231731687303715884105727")
            }
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn whole_json_numbers_decode_as_int() {
        assert_eq!(json_to_value(serde_json::json!(7)), Value::Int(7));
        assert_eq!(json_to_value(serde_json::json!(7.5)), Value::Float(7.5));
    }

    #[test]
    fn scalar_conversion_maps_numbers_to_float() {
        assert_eq!(Value::from(Scalar::Number(2.0)), Value::Float(2.0));
        assert_eq!(Value::from(Scalar::Null), Value::Null);
    }
}
