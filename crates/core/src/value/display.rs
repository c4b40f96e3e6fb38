use std::fmt::{self, Display, Formatter};

use crate::value::Value;

fn write_seq(f: &mut Formatter<'_>, open: char, close: char, items: &[Value]) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => write_seq(f, '[', ']', items),
            Self::Set(items) => write_seq(f, '{', '}', items),
            Self::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Struct(s) => write!(f, "{s}"),
            Self::Native(n) => write!(f, "{n:?}"),
        }
    }
}
