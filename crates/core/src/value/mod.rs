//! Dynamic values exchanged with the mapper.
//!
//! [`Value`] covers both sides of a mapping: the loosely typed payload
//! (null, booleans, numbers, strings, arrays and objects) and the native side
//! (decimals, timestamps, sets, struct instances and opaque native objects).

mod conversions;
mod display;
mod kind;
pub(crate) mod native;
mod serde;

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::structs::StructValue;

pub use kind::ValueKind;
pub use native::{NativeObject, NativeValue};
pub use self::serde::IntoJsonError;

/// Insertion-ordered string keyed map.
pub type Object = IndexMap<String, Value>;

/// A dynamically typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Unordered collection without duplicates. Insertion order is kept for
    /// iteration, equality ignores it.
    Set(Vec<Value>),
    Object(Object),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    /// Instance of a [`StructDef`](crate::StructDef).
    Struct(StructValue),
    /// Opaque instance of a native class.
    Native(NativeValue),
}

impl Value {
    // ==================== Constructors ====================

    /// Build a set, dropping duplicates while keeping first occurrences.
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut out: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Self::Set(out)
    }

    /// Build an array.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build an object from key/value pairs, keeping their order.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a native value.
    pub fn native<T: NativeObject + PartialEq>(object: T) -> Self {
        Self::Native(NativeValue::new(object))
    }

    // ==================== Queries ====================

    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(self)
    }

    /// Name used in diagnostics: the struct or class name for instances, the
    /// kind name otherwise.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Self::Struct(s) => Cow::Owned(s.def().name()),
            Self::Native(n) => Cow::Borrowed(n.class_name()),
            other => Cow::Borrowed(other.kind().name()),
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_) | Self::Decimal(_))
    }

    /// Array or set.
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Set(_))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Truthiness: null, `false`, zero and empty containers are false.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Decimal(d) => !d.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::Array(items) | Self::Set(items) => !items.is_empty(),
            Self::Object(map) => !map.is_empty(),
            Self::DateTime(_) | Self::Date(_) | Self::Struct(_) | Self::Native(_) => true,
        }
    }

    // ==================== Accessors ====================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        use rust_decimal::prelude::ToPrimitive;
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of an array or set.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeValue> {
        match self {
            Self::Native(n) => Some(n),
            _ => None,
        }
    }

    /// Look up `key` on an object or a struct instance.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            Self::Struct(s) => s.get(key),
            _ => None,
        }
    }

    /// Text form used when coercing to a string: strings are returned
    /// unquoted, everything else uses the `Display` rendering.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Native(a), Self::Native(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_drops_duplicates_and_ignores_order() {
        let a = Value::set(["x", "y", "x"]);
        assert_eq!(a.as_slice().map(<[Value]>::len), Some(2));
        assert_eq!(a, Value::set(["y", "x"]));
        assert_ne!(a, Value::array(["x", "y"]));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.truthy());
        assert!(!Value::from(0).truthy());
        assert!(Value::from("a").truthy());
        assert!(!Value::array(Vec::<Value>::new()).truthy());
        assert!(Value::object([("k", 1)]).truthy());
    }

    #[test]
    fn plain_string_keeps_strings_unquoted() {
        assert_eq!(Value::from("bar").to_plain_string(), "bar");
        assert_eq!(Value::array(["bar"]).to_plain_string(), r#"["bar"]"#);
        assert_eq!(Value::from(23).to_plain_string(), "23");
    }

    #[test]
    fn numeric_variants_do_not_compare_across_kinds() {
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
    }
}
