//! Native type expressions.
//!
//! A [`TypeDef`] is the shorthand a user writes where a datatype is
//! expected: a builtin scalar, a list or set literal, a generic alias, a
//! tuple, an optional, a struct, a native class or an already built
//! [`Datatype`]. The [`TypeRegistry`](crate::TypeRegistry) turns it into a
//! datatype.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use crate::datatype::{ClassType, Datatype};
use crate::structs::StructDef;

/// Builtin native types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Bool,
    Str,
    Int,
    Float,
    Decimal,
    /// Any value.
    Object,
    /// Untyped list.
    List,
    /// Untyped set.
    Set,
    /// Untyped string keyed map.
    Dict,
    Datetime,
    Date,
}

impl NativeType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Object => "object",
            Self::List => "list",
            Self::Set => "set",
            Self::Dict => "dict",
            Self::Datetime => "datetime",
            Self::Date => "date",
        }
    }
}

/// A native type expression.
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// Already a datatype; passes through unchanged.
    Datatype(Datatype),
    Native(NativeType),
    /// `[]` or `[T]`.
    ListLiteral(Vec<TypeDef>),
    /// `{T}`.
    SetLiteral(Vec<TypeDef>),
    /// `{}`, `{"value_type": T}`, or an inline struct `{name: T, ...}`.
    MapLiteral(Vec<(String, TypeDef)>),
    /// `List[T]`.
    List(Box<TypeDef>),
    /// `Set[T]`.
    Set(Box<TypeDef>),
    /// `Dict[K, V]`; only string keys are supported.
    Dict(Box<TypeDef>, Box<TypeDef>),
    /// `(A, B, ...)`: a value of any of the member types.
    Tuple(Vec<TypeDef>),
    /// `Optional[T]`. Only meaningful as a field type.
    Optional(Box<TypeDef>),
    Struct(Arc<StructDef>),
    Class(ClassType),
    /// An unbound type variable.
    TypeVar(String),
}

impl TypeDef {
    pub const BOOL: Self = Self::Native(NativeType::Bool);
    pub const STR: Self = Self::Native(NativeType::Str);
    pub const INT: Self = Self::Native(NativeType::Int);
    pub const FLOAT: Self = Self::Native(NativeType::Float);
    pub const DECIMAL: Self = Self::Native(NativeType::Decimal);
    pub const OBJECT: Self = Self::Native(NativeType::Object);
    pub const LIST: Self = Self::Native(NativeType::List);
    pub const SET: Self = Self::Native(NativeType::Set);
    pub const DICT: Self = Self::Native(NativeType::Dict);
    pub const DATETIME: Self = Self::Native(NativeType::Datetime);
    pub const DATE: Self = Self::Native(NativeType::Date);

    /// `List[item]`.
    pub fn list_of(item: impl Into<Self>) -> Self {
        Self::List(Box::new(item.into()))
    }

    /// `Set[item]`.
    pub fn set_of(item: impl Into<Self>) -> Self {
        Self::Set(Box::new(item.into()))
    }

    /// `Dict[str, value]`.
    pub fn dict_of(value: impl Into<Self>) -> Self {
        Self::Dict(Box::new(Self::STR), Box::new(value.into()))
    }

    /// `Optional[inner]`.
    pub fn optional(inner: impl Into<Self>) -> Self {
        Self::Optional(Box::new(inner.into()))
    }

    /// `(a, b, ...)`.
    pub fn tuple<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Tuple(members.into_iter().map(Into::into).collect())
    }

    /// `{name: def, ...}`.
    pub fn map_literal<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Self>,
    {
        Self::MapLiteral(
            entries
                .into_iter()
                .map(|(k, t)| (k.into(), t.into()))
                .collect(),
        )
    }
}

impl From<Datatype> for TypeDef {
    fn from(datatype: Datatype) -> Self {
        Self::Datatype(datatype)
    }
}

impl From<NativeType> for TypeDef {
    fn from(native: NativeType) -> Self {
        Self::Native(native)
    }
}

impl From<Arc<StructDef>> for TypeDef {
    fn from(def: Arc<StructDef>) -> Self {
        Self::Struct(def)
    }
}

impl From<&Arc<StructDef>> for TypeDef {
    fn from(def: &Arc<StructDef>) -> Self {
        Self::Struct(Arc::clone(def))
    }
}

impl From<ClassType> for TypeDef {
    fn from(class: ClassType) -> Self {
        Self::Class(class)
    }
}

fn write_list(f: &mut Formatter<'_>, items: &[TypeDef]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for TypeDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatype(datatype) => write!(f, "{datatype}"),
            Self::Native(native) => f.write_str(native.name()),
            Self::ListLiteral(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Self::SetLiteral(items) => {
                f.write_str("{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            Self::MapLiteral(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Self::List(item) => write!(f, "List[{item}]"),
            Self::Set(item) => write!(f, "Set[{item}]"),
            Self::Dict(k, v) => write!(f, "Dict[{k}, {v}]"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Struct(def) => f.write_str(&def.name()),
            Self::Class(class) => f.write_str(class.name()),
            Self::TypeVar(name) => write!(f, "~{name}"),
        }
    }
}
