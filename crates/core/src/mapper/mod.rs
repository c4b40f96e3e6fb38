//! Converter dispatch.
//!
//! An [`ObjectMapper`] owns a [`ConverterRegistry`] filled by [`Module`]s
//! and a [`TypeRegistry`](crate::TypeRegistry) for native type expressions.
//! Each conversion walks the value tree through a [`Context`]: the context
//! looks up the converter for the datatype at the current [`Location`] and
//! converters recurse into children through the same context.

mod context;
mod converters;
mod object_mapper;

use std::fmt::{self, Display, Formatter};

use crate::error::MapperError;
use crate::location::Location;
use crate::value::Value;

pub use context::Context;
pub use converters::ConverterRegistry;
pub use object_mapper::{ObjectMapper, ObjectMapperBuilder};

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Wire payload to in-process value.
    Deserialize,
    /// In-process value to wire payload.
    Serialize,
}

impl Direction {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Deserialize => "deserialize",
            Self::Serialize => "serialize",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts the wire value at a location into an in-process value.
pub trait Deserializer: Send + Sync {
    fn deserialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError>;
}

/// Converts the in-process value at a location into a wire value.
pub trait Serializer: Send + Sync {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError>;
}

/// A bundle of converters for one wire format.
pub trait Module: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Register the module's converters.
    fn setup(&self, converters: &mut ConverterRegistry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{CollectionType, Datatype, DatatypeKind, IntegerType, StringType};
    use crate::decoration::{Decoration, Decorations};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Offset(i64);

    impl Decoration for Offset {}

    /// Adds the closest `Offset` decoration on deserialize, subtracts it on
    /// serialize.
    struct Shifted;

    impl Shifted {
        fn shift(ctx: &Context<'_>, location: &Location<'_>) -> Result<i64, MapperError> {
            let value = location.value().as_i64().ok_or_else(|| location.type_mismatch())?;
            let offset = ctx.decoration::<Offset>(location).map_or(0, |o| o.0);
            Ok(match ctx.direction() {
                Direction::Deserialize => value + offset,
                Direction::Serialize => value - offset,
            })
        }
    }

    impl Deserializer for Shifted {
        fn deserialize(
            &self,
            ctx: &Context<'_>,
            location: &Location<'_>,
        ) -> Result<Value, MapperError> {
            Self::shift(ctx, location).map(Value::from)
        }
    }

    impl Serializer for Shifted {
        fn serialize(
            &self,
            ctx: &Context<'_>,
            location: &Location<'_>,
        ) -> Result<Value, MapperError> {
            Self::shift(ctx, location).map(Value::from)
        }
    }

    struct Items;

    impl Deserializer for Items {
        fn deserialize(
            &self,
            ctx: &Context<'_>,
            location: &Location<'_>,
        ) -> Result<Value, MapperError> {
            let Datatype::Collection(collection) = location.datatype() else {
                return Err(location.type_mismatch());
            };
            let items = location.value().as_slice().ok_or_else(|| location.type_mismatch())?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let none = Decorations::new();
                    ctx.convert_child(location, i, item, collection.item_type(), &none)
                })
                .collect()
        }
    }

    struct TestModule;

    impl Module for TestModule {
        fn name(&self) -> &'static str {
            "test"
        }

        fn setup(&self, converters: &mut ConverterRegistry) {
            converters
                .register_duplex(DatatypeKind::Integer, Shifted)
                .register_deserializer(DatatypeKind::Collection, Items);
        }
    }

    fn int() -> Datatype {
        IntegerType::default().into()
    }

    #[test]
    fn dispatches_by_kind_in_both_directions() {
        let mapper = ObjectMapper::new(TestModule);
        let offset = Decorations::from(Offset(10));
        assert_eq!(
            mapper.deserialize_with(&Value::from(1), &int(), &offset).unwrap(),
            Value::from(11)
        );
        assert_eq!(
            mapper.serialize_with(&Value::from(11), &int(), &offset).unwrap(),
            Value::from(1)
        );
        assert_eq!(mapper.deserialize(&Value::from(1), &int()).unwrap(), Value::from(1));
    }

    #[test]
    fn missing_converters_are_configuration_errors() {
        let mapper = ObjectMapper::new(TestModule);
        let err = mapper
            .deserialize(&Value::from("x"), &StringType::default().into())
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "at $: no deserializer registered for datatype String");

        let list = Datatype::from(CollectionType::list(int()));
        let err = mapper.serialize(&Value::array([1]), &list).unwrap_err();
        assert_eq!(err.to_string(), "at $: no serializer registered for datatype Collection");
    }

    #[test]
    fn child_errors_carry_their_path() {
        let mapper = ObjectMapper::new(TestModule);
        let list = Datatype::from(CollectionType::list(int()));
        let err = mapper
            .deserialize(&Value::array([Value::from(1), Value::from("two")]), &list)
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$[1]");
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn proxies_are_unwrapped_before_dispatch() {
        let mapper = ObjectMapper::new(TestModule);
        let proxy = Datatype::forward_decl("Number");
        let datatype = Datatype::Proxy(proxy.clone());
        let err = mapper.deserialize(&Value::from(1), &datatype).unwrap_err();
        assert_eq!(err.code(), "unresolved_proxy");

        proxy.close(int()).unwrap();
        assert_eq!(mapper.deserialize(&Value::from(1), &datatype).unwrap(), Value::from(1));
    }

    #[test]
    fn field_decorations_win_over_call_decorations() {
        let mapper = ObjectMapper::new(TestModule);
        let call = Decorations::from(Offset(100));
        let field = Decorations::from(Offset(1));
        let ctx = Context::new(&mapper, Direction::Deserialize, &call);
        let value = Value::from(1);
        let datatype = int();
        let none = Decorations::new();
        let root = Location::root(&value, &datatype, &none);
        assert_eq!(ctx.decoration::<Offset>(&root).map(|o| o.0), Some(100));
        let child = root.child("x", &value, &datatype, &field);
        assert_eq!(ctx.decoration::<Offset>(&child).map(|o| o.0), Some(1));
    }

    #[test]
    fn later_registrations_replace_earlier_ones() {
        struct Zero;
        impl Deserializer for Zero {
            fn deserialize(&self, _: &Context<'_>, _: &Location<'_>) -> Result<Value, MapperError> {
                Ok(Value::from(0))
            }
        }

        let mapper = ObjectMapper::builder()
            .module(TestModule)
            .deserializer(DatatypeKind::Integer, Zero)
            .build();
        assert_eq!(mapper.deserialize(&Value::from(5), &int()).unwrap(), Value::from(0));
        assert_eq!(mapper.serialize(&Value::from(5), &int()).unwrap(), Value::from(5));
        assert_eq!(mapper.modules(), ["test"]);
    }
}
