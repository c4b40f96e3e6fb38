//! # databind-core
//!
//! Typed object mapping between native values and loosely typed payloads.
//!
//! The crate is organised around four ideas:
//!
//! - [`Value`]: the dynamic value both sides of a mapping are expressed in.
//! - [`Datatype`]: a closed set of type descriptors that can validate and
//!   coerce values, built from native type expressions ([`TypeDef`]) by a
//!   [`TypeRegistry`].
//! - [`StructDef`]: record types declared from an ordered [`FieldSpec`].
//! - [`ObjectMapper`]: dispatches a [`Location`] to the converter a
//!   [`Module`] registered for its datatype, in either direction.
//!
//! Wire formats live in separate crates (`databind-json`).
//!
//! ```rust
//! use databind_core::{TypeDef, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::builtin();
//! let datatype = registry.translate(&TypeDef::list_of(TypeDef::STR)).unwrap();
//! assert_eq!(datatype.to_string(), "Collection<String>");
//!
//! let checked = datatype.check_value(Value::from(vec!["a", "b"]), false, true);
//! assert!(checked.is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod datatype;
pub mod decoration;
pub mod error;
pub mod location;
pub mod mapper;
pub mod registry;
pub mod structs;
pub mod typedef;
pub mod value;

pub use datatype::{
    BooleanType, ClassType, CollectionKind, CollectionType, DEFAULT_TYPE_KEY, Datatype,
    DatatypeKind, DateType, DatetimeType, DecimalBacking, DecimalType, EnumType, ISO_DATE,
    IntegerType, MultiType, ObjectType, ProxyType, StaticUnionResolver, StringType, StructType,
    UnionResolver, UnionType,
};
pub use decoration::{
    Decoration, Decorations, Format, InheritKey, Raw, Remainder, SkipDefaults, Strict,
};
pub use error::{CheckError, Error, FieldError, MapperError, StructError, TypeDefError};
pub use location::{Location, Path, PathSegment};
pub use mapper::{
    Context, ConverterRegistry, Deserializer, Direction, Module, ObjectMapper,
    ObjectMapperBuilder, Serializer,
};
pub use registry::{Resolver, TypeAdapter, TypeRegistry};
pub use structs::{
    Annotation, DefaultFactory, Field, FieldDefault, FieldSpec, INLINE_STRUCT_NAME, ListItem,
    REMAINDER_PRIORITY, StructBuilder, StructDef, StructValue, create_struct,
};
pub use typedef::{NativeType, TypeDef};
pub use value::{IntoJsonError, NativeObject, NativeValue, Object, Value, ValueKind};

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        Datatype, Decoration, Decorations, Field, FieldSpec, Location, MapperError, Module,
        ObjectMapper, StructDef, StructValue, TypeDef, TypeRegistry, Value,
    };
}
