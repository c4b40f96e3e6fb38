//! Datatypes: resolved type descriptors.
//!
//! [`Datatype`] is a closed set of variants. Every variant can check (and
//! optionally coerce) an in-process [`Value`] with
//! [`check_value`](Datatype::check_value). Converters are looked up by
//! [`DatatypeKind`].
//!
//! Container variants always hold fully resolved sub-datatypes; native type
//! expressions are translated once, by the [`TypeRegistry`](crate::TypeRegistry),
//! before a datatype is built.

mod class;
mod container;
mod multi;
mod proxy;
mod scalar;
mod structure;
mod temporal;
mod union;

use std::fmt::{self, Display, Formatter};

use crate::error::CheckError;
use crate::value::Value;

pub use class::ClassType;
pub use container::{CollectionKind, CollectionType, ObjectType};
pub use multi::MultiType;
pub use proxy::ProxyType;
pub use scalar::{BooleanType, DecimalBacking, DecimalType, EnumType, IntegerType, StringType};
pub use structure::StructType;
pub use temporal::{DateType, DatetimeType, ISO_DATE};
pub use union::{DEFAULT_TYPE_KEY, StaticUnionResolver, UnionResolver, UnionType};

/// Discriminant of a [`Datatype`], used to look up converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatatypeKind {
    Any,
    Boolean,
    String,
    Integer,
    Decimal,
    Datetime,
    Date,
    Enum,
    Collection,
    Object,
    Struct,
    Class,
    Multi,
    Union,
    Proxy,
}

impl DatatypeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Datetime => "Datetime",
            Self::Date => "Date",
            Self::Enum => "Enum",
            Self::Collection => "Collection",
            Self::Object => "Object",
            Self::Struct => "Struct",
            Self::Class => "Class",
            Self::Multi => "Multi",
            Self::Union => "Union",
            Self::Proxy => "Proxy",
        }
    }
}

impl Display for DatatypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Datatype {
    /// Accepts every value unchanged.
    Any,
    Boolean(BooleanType),
    String(StringType),
    Integer(IntegerType),
    Decimal(DecimalType),
    Datetime(DatetimeType),
    Date(DateType),
    Enum(EnumType),
    Collection(CollectionType),
    Object(ObjectType),
    Struct(StructType),
    Class(ClassType),
    Multi(MultiType),
    Union(UnionType),
    Proxy(ProxyType),
}

impl Datatype {
    /// A forward declaration to be closed once the referenced datatype
    /// exists. See [`ProxyType`].
    pub fn forward_decl(name: impl Into<String>) -> ProxyType {
        ProxyType::declare(name)
    }

    pub const fn kind(&self) -> DatatypeKind {
        match self {
            Self::Any => DatatypeKind::Any,
            Self::Boolean(_) => DatatypeKind::Boolean,
            Self::String(_) => DatatypeKind::String,
            Self::Integer(_) => DatatypeKind::Integer,
            Self::Decimal(_) => DatatypeKind::Decimal,
            Self::Datetime(_) => DatatypeKind::Datetime,
            Self::Date(_) => DatatypeKind::Date,
            Self::Enum(_) => DatatypeKind::Enum,
            Self::Collection(_) => DatatypeKind::Collection,
            Self::Object(_) => DatatypeKind::Object,
            Self::Struct(_) => DatatypeKind::Struct,
            Self::Class(_) => DatatypeKind::Class,
            Self::Multi(_) => DatatypeKind::Multi,
            Self::Union(_) => DatatypeKind::Union,
            Self::Proxy(_) => DatatypeKind::Proxy,
        }
    }

    /// Check `value` against this datatype.
    ///
    /// `strict` is ORed with the datatype's own strict flag and disables
    /// conversions between kinds. `coerce` converts accepted values to the
    /// canonical in-process representation (e.g. an array to a set for a
    /// set-backed collection). Returns the (possibly coerced) value.
    pub fn check_value(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match self {
            Self::Any => Ok(value),
            Self::Boolean(t) => t.check(value, strict, coerce),
            Self::String(t) => t.check(value, strict, coerce),
            Self::Integer(t) => t.check(value, strict, coerce),
            Self::Decimal(t) => t.check(value, strict, coerce),
            Self::Datetime(t) => t.check(value, strict, coerce),
            Self::Date(t) => t.check(value, strict, coerce),
            Self::Enum(t) => t.check(value),
            Self::Collection(t) => t.check(value, strict, coerce),
            Self::Object(t) => t.check(value, strict, coerce),
            Self::Struct(t) => t.check(value, strict, coerce),
            Self::Class(t) => t.check(value),
            Self::Multi(t) => t.check(value, strict, coerce),
            Self::Union(t) => t.check(value),
            Self::Proxy(t) => t.check(value, strict, coerce),
        }
    }

    /// Whether `value` passes [`check_value`](Self::check_value) without
    /// coercion.
    pub fn accepts(&self, value: &Value) -> bool {
        self.check_value(value.clone(), true, false).is_ok()
    }

    /// Follow closed forward declarations to the datatype they stand for.
    /// Returns `None` for an unclosed declaration.
    pub fn resolved(&self) -> Option<&Self> {
        match self {
            Self::Proxy(proxy) => proxy.get().and_then(Self::resolved),
            other => Some(other),
        }
    }

    /// Give anonymous inline structs a name derived from the field that
    /// holds them.
    pub(crate) fn propagate_field_name(&self, qualified_name: &str) {
        match self {
            Self::Struct(t) => t.def().propagate_name(qualified_name),
            Self::Collection(t) => t.item_type().propagate_field_name(qualified_name),
            Self::Object(t) => t.value_type().propagate_field_name(qualified_name),
            _ => {}
        }
    }
}

impl Display for Datatype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Boolean(_) => f.write_str("Boolean"),
            Self::String(_) => f.write_str("String"),
            Self::Integer(_) => f.write_str("Integer"),
            Self::Decimal(_) => f.write_str("Decimal"),
            Self::Datetime(_) => f.write_str("Datetime"),
            Self::Date(_) => f.write_str("Date"),
            Self::Enum(t) => f.write_str(t.name()),
            Self::Collection(t) => write!(f, "{t}"),
            Self::Object(t) => write!(f, "Object<{}>", t.value_type()),
            Self::Struct(t) => f.write_str(&t.def().name()),
            Self::Class(t) => f.write_str(t.name()),
            Self::Multi(t) => write!(f, "{t}"),
            Self::Union(t) => write!(f, "{t}"),
            Self::Proxy(t) => f.write_str(t.name()),
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Datatype {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant! {
    BooleanType => Boolean,
    StringType => String,
    IntegerType => Integer,
    DecimalType => Decimal,
    DatetimeType => Datetime,
    DateType => Date,
    EnumType => Enum,
    CollectionType => Collection,
    ObjectType => Object,
    StructType => Struct,
    ClassType => Class,
    MultiType => Multi,
    UnionType => Union,
    ProxyType => Proxy,
}

/// Mismatch error for `value` against `expected`.
pub(crate) fn mismatch(expected: impl Display, value: &Value) -> CheckError {
    CheckError::mismatch(expected.to_string(), value.type_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_names() {
        let t = Datatype::from(CollectionType::list(ObjectType::new(IntegerType::default())));
        assert_eq!(t.to_string(), "Collection<Object<Integer>>");
        assert_eq!(t.kind(), DatatypeKind::Collection);
        let multi = Datatype::from(MultiType::new([
            Datatype::from(IntegerType::default()),
            Datatype::from(StringType::default()),
        ]));
        assert_eq!(multi.to_string(), "Multi<Integer | String>");
    }

    #[test]
    fn any_accepts_everything() {
        assert!(Datatype::Any.accepts(&Value::Null));
        assert!(Datatype::Any.accepts(&Value::array([1, 2])));
    }

    #[test]
    fn resolved_follows_closed_proxies() {
        let proxy = Datatype::forward_decl("Number");
        let datatype = Datatype::Proxy(proxy.clone());
        assert!(datatype.resolved().is_none());
        proxy.close(IntegerType::default()).unwrap();
        assert_eq!(datatype.resolved(), Some(&Datatype::from(IntegerType::default())));
    }
}
