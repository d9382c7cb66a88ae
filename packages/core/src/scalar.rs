//! The Scalar type - the only thing the store ever persists.

use serde::{Deserialize, Serialize};

/// A storage-safe scalar value.
///
/// The store persists nothing else: no objects, no arrays, no dates. Richer
/// application types are flattened to one of these four shapes by a codec
/// layer before they reach the store.
///
/// # Design Notes
///
/// - Numbers are `f64`, matching the JSON data model the store serializes to
/// - A stored `Null` is a real entry, distinct from "no entry at this id"
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// UTF-8 string.
    String(String),
    /// 64-bit floating point (JSON number).
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// Null.
    Null,
}

impl Scalar {
    /// A short tag naming this scalar's runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Number(_) => "number",
            Scalar::Bool(_) => "boolean",
            Scalar::Null => "null",
        }
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric contents, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean contents, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check if this scalar is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

// Conversion from common types

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Number(v as f64)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Number(v as f64)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Scalar::from("x").type_name(), "string");
        assert_eq!(Scalar::from(1.5).type_name(), "number");
        assert_eq!(Scalar::from(true).type_name(), "boolean");
        assert_eq!(Scalar::Null.type_name(), "null");
    }

    #[test]
    fn accessors() {
        assert_eq!(Scalar::from("hello").as_str(), Some("hello"));
        assert_eq!(Scalar::from(42i64).as_number(), Some(42.0));
        assert_eq!(Scalar::from(false).as_bool(), Some(false));
        assert!(Scalar::Null.is_null());
        assert_eq!(Scalar::Null.as_str(), None);
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&Scalar::from("a")).unwrap(),
            "\"a\""
        );
        assert_eq!(serde_json::to_string(&Scalar::from(2i64)).unwrap(), "2.0");
        assert_eq!(serde_json::to_string(&Scalar::from(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Scalar::Null).unwrap(), "null");
    }

    #[test]
    fn deserializes_untagged() {
        let s: Scalar = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(s, Scalar::from("a"));
        let s: Scalar = serde_json::from_str("2.5").unwrap();
        assert_eq!(s, Scalar::from(2.5));
        let s: Scalar = serde_json::from_str("false").unwrap();
        assert_eq!(s, Scalar::from(false));
        let s: Scalar = serde_json::from_str("null").unwrap();
        assert_eq!(s, Scalar::Null);
    }
}
