//! Serde support and `serde_json` interop for [`Value`].
//!
//! Only the plain subset of values has a direct serde representation. Decimals
//! are written as strings to preserve precision, timestamps as RFC 3339 /
//! ISO 8601 strings, sets as sequences and struct instances as maps of their
//! field values. Native objects cannot be serialized without going through a
//! class converter.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::value::{Object, Value, ValueKind};

/// A [`Value`] that has no `serde_json::Value` counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IntoJsonError {
    #[error("{kind} values cannot be represented as JSON")]
    NotRepresentable { kind: ValueKind },

    #[error("non-finite float {value} cannot be represented as JSON")]
    NonFiniteFloat { value: String },
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            // Serialize as string to preserve precision
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Struct(s) => {
                let mut out = serializer.serialize_map(Some(s.len()))?;
                for (k, v) in s.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Native(n) => Err(ser::Error::custom(format!(
                "native value of class {} has no serde representation",
                n.class_name()
            ))),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any JSON-like value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Object::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<String, Value>()? {
            map.insert(k, v);
        }
        Ok(Value::Object(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// ==================== serde_json interop ====================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = IntoJsonError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Integer(i) => Self::from(i),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(Self::Number)
                .ok_or_else(|| IntoJsonError::NonFiniteFloat {
                    value: x.to_string(),
                })?,
            Value::Decimal(d) => Self::String(d.to_string()),
            Value::String(s) => Self::String(s),
            Value::Array(items) | Value::Set(items) => Self::Array(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                    .collect::<Result<_, IntoJsonError>>()?,
            ),
            Value::DateTime(dt) => Self::String(dt.to_rfc3339()),
            Value::Date(d) => Self::String(d.format("%Y-%m-%d").to_string()),
            other @ (Value::Struct(_) | Value::Native(_)) => {
                return Err(IntoJsonError::NotRepresentable { kind: other.kind() });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn json_round_trip_keeps_key_order() {
        let raw = json!({"b": 1, "a": [true, null, 1.5], "c": {"x": "y"}});
        let value = Value::from(raw.clone());
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(serde_json::Value::try_from(value).unwrap(), raw);
    }

    #[test]
    fn decimals_become_strings() {
        let value = Value::Decimal(Decimal::new(10234, 3));
        assert_eq!(serde_json::Value::try_from(value).unwrap(), json!("10.234"));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let err = serde_json::Value::try_from(Value::Float(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, IntoJsonError::NonFiniteFloat { .. }));
    }

    #[test]
    fn serde_deserialize_reads_json_text() {
        let value: Value = serde_json::from_str(r#"{"a": [1, "x"]}"#).unwrap();
        assert_eq!(value, Value::object([("a", Value::array([Value::from(1), Value::from("x")]))]));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":[1,"x"]}"#);
    }
}
