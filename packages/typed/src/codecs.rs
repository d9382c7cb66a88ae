//! Pre-built field codecs.
//!
//! These are the transforms applications compose into row and value shapes:
//! an identity codec for plain scalars, a JSON codec for structured values,
//! three date representations, and a string-backed big integer.
//!
//! Every codec here (except [`PlainCodec`]) encodes `Value::Null` to
//! absence, so writing null through one of them deletes the entry.

use chrono::{DateTime, Utc};
use tabstore_core::Scalar;

use crate::error::Error;
use crate::schema::FieldCodec;
use crate::value::{json_to_value, value_to_json, Value};

/// The identity codec for fields that are already storage scalars.
///
/// Encode passes the value through unchanged; the scalar guard still runs,
/// so a structured value in a plain field fails the write. Decode maps
/// stored numbers to `Value::Float`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl FieldCodec for PlainCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        Ok(Some(value.clone()))
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        Ok(Value::from(scalar))
    }
}

/// Structured values as their JSON text form.
///
/// # Example
///
/// ```rust
/// use tabstore_core::Scalar;
/// use tabstore_typed::{FieldCodec, JsonCodec, Value};
///
/// let map = Value::Map([("s".to_string(), Value::from("x"))].into_iter().collect());
/// let encoded = JsonCodec.encode(&map).unwrap().unwrap();
/// assert_eq!(encoded, Value::from(r#"{"s":"x"}"#));
///
/// let decoded = JsonCodec.decode(&Scalar::from(r#"{"s":"x"}"#)).unwrap();
/// assert_eq!(decoded, map);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl FieldCodec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        if matches!(value, Value::Null) {
            return Ok(None);
        }
        let text = serde_json::to_string(&value_to_json(value.clone()))
            .map_err(|e| Error::codec(format!("json encode failed: {e}")))?;
        Ok(Some(Value::String(text)))
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        let text = scalar.as_str().ok_or_else(|| {
            Error::codec(format!(
                "json codec expects a stored string, got {}",
                scalar.type_name()
            ))
        })?;
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::codec(format!("json decode failed: {e}")))?;
        Ok(json_to_value(json))
    }
}

/// Dates as RFC 3339 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoDateCodec;

impl FieldCodec for IsoDateCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::Time(t) => Ok(Some(Value::String(t.to_rfc3339()))),
            other => Err(Error::codec(format!(
                "iso date codec expects a time value, got {}",
                other.type_name()
            ))),
        }
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        let text = scalar.as_str().ok_or_else(|| {
            Error::codec(format!(
                "iso date codec expects a stored string, got {}",
                scalar.type_name()
            ))
        })?;
        let parsed = DateTime::parse_from_rfc3339(text)
            .map_err(|e| Error::codec(format!("invalid RFC 3339 date {text:?}: {e}")))?;
        Ok(Value::Time(parsed.with_timezone(&Utc)))
    }
}

/// Dates as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MillisDateCodec;

impl FieldCodec for MillisDateCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::Time(t) => Ok(Some(Value::Float(t.timestamp_millis() as f64))),
            other => Err(Error::codec(format!(
                "millis date codec expects a time value, got {}",
                other.type_name()
            ))),
        }
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        let millis = scalar.as_number().ok_or_else(|| {
            Error::codec(format!(
                "millis date codec expects a stored number, got {}",
                scalar.type_name()
            ))
        })?;
        DateTime::from_timestamp_millis(millis as i64)
            .map(Value::Time)
            .ok_or_else(|| Error::codec(format!("millisecond timestamp {millis} out of range")))
    }
}

/// Dates as whole seconds since the Unix epoch.
///
/// Encode truncates sub-second precision, so this codec does not round-trip
/// times with fractional seconds exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecsDateCodec;

impl FieldCodec for SecsDateCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::Time(t) => Ok(Some(Value::Float(t.timestamp() as f64))),
            other => Err(Error::codec(format!(
                "seconds date codec expects a time value, got {}",
                other.type_name()
            ))),
        }
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        let secs = scalar.as_number().ok_or_else(|| {
            Error::codec(format!(
                "seconds date codec expects a stored number, got {}",
                scalar.type_name()
            ))
        })?;
        DateTime::from_timestamp(secs as i64, 0)
            .map(Value::Time)
            .ok_or_else(|| Error::codec(format!("second timestamp {secs} out of range")))
    }
}

/// Integers as decimal strings, exact beyond `f64`'s 53-bit range.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntCodec;

impl FieldCodec for BigIntCodec {
    fn encode(&self, value: &Value) -> Result<Option<Value>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::BigInt(i) => Ok(Some(Value::String(i.to_string()))),
            Value::Int(i) => Ok(Some(Value::String(i.to_string()))),
            other => Err(Error::codec(format!(
                "big int codec expects an integer value, got {}",
                other.type_name()
            ))),
        }
    }

    fn decode(&self, scalar: &Scalar) -> Result<Value, Error> {
        let text = scalar.as_str().ok_or_else(|| {
            Error::codec(format!(
                "big int codec expects a stored string, got {}",
                scalar.type_name()
            ))
        })?;
        let parsed: i128 = text
            .parse()
            .map_err(|e| Error::codec(format!("invalid integer string {text:?}: {e}")))?;
        Ok(Value::BigInt(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn json_codec_roundtrip() {
        let original = Value::Map(
            [
                ("name".to_string(), Value::from("Alice")),
                ("age".to_string(), Value::Int(30)),
            ]
            .into_iter()
            .collect(),
        );

        let encoded = JsonCodec.encode(&original).unwrap().unwrap();
        let stored = Scalar::String(encoded.as_str().unwrap().to_string());
        let decoded = JsonCodec.decode(&stored).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn json_codec_rejects_non_string_storage() {
        assert!(JsonCodec.decode(&Scalar::Number(1.0)).is_err());
    }

    #[test]
    fn iso_date_roundtrip() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap();
        let encoded = IsoDateCodec.encode(&Value::Time(t)).unwrap().unwrap();
        let decoded = IsoDateCodec
            .decode(&Scalar::String(encoded.as_str().unwrap().to_string()))
            .unwrap();
        assert_eq!(decoded, Value::Time(t));
    }

    #[test]
    fn millis_date_roundtrip() {
        let t = DateTime::from_timestamp_millis(1_717_243_845_123).unwrap();
        let encoded = MillisDateCodec.encode(&Value::Time(t)).unwrap().unwrap();
        assert_eq!(encoded, Value::Float(1_717_243_845_123.0));
        let decoded = MillisDateCodec
            .decode(&Scalar::Number(1_717_243_845_123.0))
            .unwrap();
        assert_eq!(decoded, Value::Time(t));
    }

    #[test]
    fn secs_date_truncates_subseconds() {
        let t = DateTime::from_timestamp_millis(1_717_243_845_999).unwrap();
        let encoded = SecsDateCodec.encode(&Value::Time(t)).unwrap().unwrap();
        assert_eq!(encoded, Value::Float(1_717_243_845.0));
    }

    #[test]
    fn bigint_exact_beyond_f64_range() {
        let big = Value::BigInt(9_007_199_254_740_993);
        let encoded = BigIntCodec.encode(&big).unwrap().unwrap();
        assert_eq!(encoded, Value::from("9007199254740993"));
        let decoded = BigIntCodec
            .decode(&Scalar::from("9007199254740993"))
            .unwrap();
        assert_eq!(decoded, big);
    }

    #[test]
    fn null_encodes_to_absence() {
        assert_eq!(JsonCodec.encode(&Value::Null).unwrap(), None);
        assert_eq!(IsoDateCodec.encode(&Value::Null).unwrap(), None);
        assert_eq!(BigIntCodec.encode(&Value::Null).unwrap(), None);
    }

    #[test]
    fn wrong_direction_input_raises() {
        assert!(IsoDateCodec.encode(&Value::from("not a time")).is_err());
        assert!(BigIntCodec.decode(&Scalar::Number(1.0)).is_err());
    }
}
