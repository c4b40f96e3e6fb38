use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{Context, Location, MapperError, Value};

use crate::converters::expect_datatype;

/// Tries each member type in order. Only type mismatches move on to the
/// next member; any other error is final.
pub(crate) struct MultiConverter;

impl MultiConverter {
    fn convert(ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let multi = expect_datatype!(location, Multi);
        let mut errors = Vec::with_capacity(multi.types().len());
        for member in multi.types() {
            match ctx.convert(&location.relocate(location.value(), member)) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_type_mismatch() => errors.push(err),
                Err(err) => return Err(err),
            }
        }
        Err(MapperError::MultiFailed {
            path: location.path().clone(),
            direction: ctx.direction(),
            datatype: location.datatype().to_string(),
            actual: location.value().type_name().into_owned(),
            errors,
        })
    }
}

impl Deserializer for MultiConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        Self::convert(ctx, location)
    }
}

impl Serializer for MultiConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(ctx, location)
    }
}

#[cfg(test)]
mod tests {
    use databind_core::{
        CollectionType, Datatype, IntegerType, MultiType, ObjectMapper, ObjectType, StringType,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::JsonModule;

    fn int_str_object() -> Datatype {
        MultiType::new([
            Datatype::from(IntegerType::default()),
            Datatype::from(StringType::default()),
            Datatype::from(ObjectType::any()),
        ])
        .into()
    }

    #[rstest]
    #[case(Value::from(42))]
    #[case(Value::from("10"))]
    #[case(Value::from("foobar"))]
    #[case(Value::object([("a", 1)]))]
    fn first_accepting_member_wins(#[case] input: Value) {
        let mapper = ObjectMapper::new(JsonModule::default());
        assert_eq!(mapper.deserialize(&input, &int_str_object()).unwrap(), input);
    }

    #[test]
    fn failures_list_every_member() {
        let mapper = ObjectMapper::new(JsonModule::default());
        let err = mapper
            .deserialize(&Value::array([1, 2]), &int_str_object())
            .unwrap_err();
        assert_eq!(err.code(), "multi_failed");
        assert!(err.is_type_mismatch());
        assert_eq!(
            err.to_string(),
            "at $: unable to deserialize Multi<Integer | String | Object<Any>> \
             for value \"array\"\n  \
             * expected \"Integer\", got \"array\"\n  \
             * expected \"String\", got \"array\"\n  \
             * expected \"Object<Any>\", got \"array\""
        );
    }

    #[test]
    fn value_mismatches_stop_the_search() {
        let datatype = Datatype::from(MultiType::new([
            Datatype::from(CollectionType::list(IntegerType::new(false))),
            Datatype::from(CollectionType::list(StringType::default())),
        ]));
        let err = ObjectMapper::new(JsonModule::default())
            .deserialize(&Value::array(["x"]), &datatype)
            .unwrap_err();
        assert!(err.is_value_mismatch());
        assert_eq!(err.path().to_string(), "$[0]");
    }
}
