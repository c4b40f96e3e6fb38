//! Value kinds.

use std::fmt::{self, Display, Formatter};

use crate::value::Value;

/// Lightweight classification of a [`Value`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    Decimal,
    String,
    Array,
    Set,
    Object,
    DateTime,
    Date,
    Struct,
    Native,
}

impl ValueKind {
    /// Get the kind of a value.
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Integer(_) => Self::Integer,
            Value::Float(_) => Self::Float,
            Value::Decimal(_) => Self::Decimal,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Set(_) => Self::Set,
            Value::Object(_) => Self::Object,
            Value::DateTime(_) => Self::DateTime,
            Value::Date(_) => Self::Date,
            Value::Struct(_) => Self::Struct,
            Value::Native(_) => Self::Native,
        }
    }

    /// Check if this kind is numeric
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Decimal)
    }

    /// Check if this kind exists in plain JSON-like payloads.
    pub const fn is_plain(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Boolean
                | Self::Integer
                | Self::Float
                | Self::String
                | Self::Array
                | Self::Object
        )
    }

    /// Get a descriptive name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Array => "array",
            Self::Set => "set",
            Self::Object => "object",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Struct => "struct",
            Self::Native => "native",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_of_values() {
        assert_eq!(ValueKind::of(&Value::Null), ValueKind::Null);
        assert_eq!(ValueKind::of(&Value::from(1.5)), ValueKind::Float);
        assert_eq!(Value::set([1]).kind().name(), "set");
        assert!(ValueKind::Decimal.is_numeric());
        assert!(!ValueKind::Date.is_plain());
    }
}
