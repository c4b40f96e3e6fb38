use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{CollectionKind, Context, Location, MapperError, Object, Value};

use crate::converters::expect_datatype;
use crate::decoration::SerializeCollectionAs;
use crate::options::JsonOptions;

/// Lists and sets. Items are converted with the collection's item type and
/// inherit the decorations of the field holding the collection.
pub(crate) struct CollectionConverter {
    collection_as: CollectionKind,
}

impl CollectionConverter {
    pub(crate) const fn new(options: &JsonOptions) -> Self {
        Self {
            collection_as: options.collection_as,
        }
    }

    fn items(ctx: &Context<'_>, location: &Location<'_>) -> Result<Vec<Value>, MapperError> {
        let datatype = expect_datatype!(location, Collection);
        let items = location.value().as_slice().ok_or_else(|| location.type_mismatch())?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let decorations = location.decorations();
                ctx.convert_child(location, index, item, datatype.item_type(), decorations)
            })
            .collect()
    }
}

impl Deserializer for CollectionConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let container = expect_datatype!(location, Collection).container();
        Ok(container.build(Self::items(ctx, location)?))
    }
}

impl Serializer for CollectionConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let container = ctx
            .decoration::<SerializeCollectionAs>(location)
            .map_or(self.collection_as, |decoration| decoration.0);
        Ok(container.build(Self::items(ctx, location)?))
    }
}

/// String keyed maps. Key order is preserved.
pub(crate) struct ObjectConverter;

impl ObjectConverter {
    fn convert(ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let datatype = expect_datatype!(location, Object);
        let entries = location.value().as_object().ok_or_else(|| location.type_mismatch())?;
        let mut out = Object::with_capacity(entries.len());
        for (key, value) in entries {
            let converted = ctx.convert_child(
                location,
                key.as_str(),
                value,
                datatype.value_type(),
                location.decorations(),
            )?;
            out.insert(key.clone(), converted);
        }
        Ok(Value::Object(out))
    }
}

impl Deserializer for ObjectConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        Self::convert(ctx, location)
    }
}

impl Serializer for ObjectConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(ctx, location)
    }
}

#[cfg(test)]
mod tests {
    use databind_core::{
        CollectionType, Datatype, Decorations, IntegerType, ObjectMapper, ObjectType, StringType,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::JsonModule;

    fn mapper() -> ObjectMapper {
        ObjectMapper::new(JsonModule::default())
    }

    #[test]
    fn sets_deserialize_into_sets() {
        let datatype = Datatype::from(CollectionType::set(StringType::default()));
        let value = mapper()
            .deserialize(&Value::array(["a", "b", "a"]), &datatype)
            .unwrap();
        assert_eq!(value, Value::set(["a", "b"]));
        assert!(matches!(value, Value::Set(_)));
    }

    #[test]
    fn collections_serialize_as_arrays_unless_decorated() {
        let datatype = Datatype::from(CollectionType::set(StringType::default()));
        let value = Value::set(["a", "b"]);
        let mapper = mapper();

        assert_eq!(mapper.serialize(&value, &datatype).unwrap(), Value::array(["a", "b"]));

        let decorations = Decorations::from(SerializeCollectionAs(CollectionKind::Set));
        let serialized = mapper.serialize_with(&value, &datatype, &decorations).unwrap();
        assert!(matches!(serialized, Value::Set(_)));
    }

    #[test]
    fn item_errors_carry_the_index() {
        let datatype = Datatype::from(CollectionType::list(IntegerType::default()));
        let err = mapper()
            .deserialize(&Value::array([Value::from(1), Value::from("two")]), &datatype)
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$[1]");
        assert_eq!(err.to_string(), r#"at $[1]: expected "Integer", got "string""#);
    }

    #[test]
    fn object_errors_carry_quoted_keys() {
        let datatype = Datatype::from(ObjectType::new(IntegerType::default()));
        let payload = Value::object([("a", Value::from(1)), ("x:y", Value::from("no"))]);
        let err = mapper().deserialize(&payload, &datatype).unwrap_err();
        assert_eq!(err.path().to_string(), r#"$."x:y""#);
    }

    #[test]
    fn objects_keep_key_order() {
        let datatype = Datatype::from(ObjectType::new(IntegerType::default()));
        let payload = Value::object([("b", 2), ("a", 1)]);
        let value = mapper().deserialize(&payload, &datatype).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn non_collections_are_type_mismatches() {
        let datatype = Datatype::from(CollectionType::list(IntegerType::default()));
        assert!(mapper()
            .deserialize(&Value::from(1), &datatype)
            .unwrap_err()
            .is_type_mismatch());
    }
}
