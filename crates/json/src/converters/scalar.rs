use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{Context, Location, MapperError, Value};

use crate::converters::{check_failed, expect_datatype};
use crate::options::JsonOptions;

/// Passes values through unchanged.
pub(crate) struct AnyConverter;

impl Deserializer for AnyConverter {
    fn deserialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Ok(location.value().clone())
    }
}

impl Serializer for AnyConverter {
    fn serialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Ok(location.value().clone())
    }
}

/// Booleans, strings and integers: the datatype's own check, coercing
/// unless the datatype is strict. Both directions behave the same.
pub(crate) struct ScalarConverter;

impl ScalarConverter {
    fn convert(location: &Location<'_>) -> Result<Value, MapperError> {
        location
            .datatype()
            .check_value(location.value().clone(), false, true)
            .map_err(|err| check_failed(location, &err))
    }
}

impl Deserializer for ScalarConverter {
    fn deserialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(location)
    }
}

impl Serializer for ScalarConverter {
    fn serialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(location)
    }
}

pub(crate) struct DecimalConverter {
    as_string: bool,
    supports_decimal: bool,
}

impl DecimalConverter {
    pub(crate) const fn new(options: &JsonOptions) -> Self {
        Self {
            as_string: options.decimal_as_string,
            supports_decimal: options.supports_decimal,
        }
    }

    /// Accept and coerce the input to the backing representation.
    fn coerce(location: &Location<'_>) -> Result<Value, MapperError> {
        let datatype = expect_datatype!(location, Decimal);
        if !datatype.accepts_input(location.value(), false) {
            return Err(location.type_mismatch());
        }
        datatype
            .coerce(location.value())
            .map_err(|err| check_failed(location, &err))
    }
}

impl Deserializer for DecimalConverter {
    fn deserialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::coerce(location)
    }
}

impl Serializer for DecimalConverter {
    fn serialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let value = Self::coerce(location)?;
        if self.as_string {
            return Ok(Value::String(value.to_plain_string()));
        }
        match value {
            Value::Decimal(d) if !self.supports_decimal => Ok(Value::String(d.to_string())),
            other => Ok(other),
        }
    }
}

/// Members of an enumeration, as their string names.
pub(crate) struct EnumConverter;

impl EnumConverter {
    fn convert(location: &Location<'_>) -> Result<Value, MapperError> {
        let datatype = expect_datatype!(location, Enum);
        let member = location.value().as_str().ok_or_else(|| location.type_mismatch())?;
        if datatype.contains(member) {
            Ok(location.value().clone())
        } else {
            Err(location.value_mismatch(datatype.not_a_member(member)))
        }
    }
}

impl Deserializer for EnumConverter {
    fn deserialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(location)
    }
}

impl Serializer for EnumConverter {
    fn serialize(&self, _: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        Self::convert(location)
    }
}

#[cfg(test)]
mod tests {
    use databind_core::{Datatype, DecimalType, EnumType, IntegerType, ObjectMapper, StringType};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;

    use super::*;
    use crate::JsonModule;

    fn mapper() -> ObjectMapper {
        ObjectMapper::new(JsonModule::default())
    }

    fn mapper_with(options: JsonOptions) -> ObjectMapper {
        ObjectMapper::new(JsonModule::with_options(options))
    }

    #[test]
    fn strings_coerce_only_when_lenient() {
        let mapper = mapper();
        let payload = Value::array(["bar"]);
        let err = mapper.deserialize(&payload, &StringType::default().into()).unwrap_err();
        assert_eq!(err.to_string(), r#"at $: expected "String", got "array""#);
        assert_eq!(
            mapper.deserialize(&payload, &StringType::new(false).into()).unwrap(),
            Value::from(r#"["bar"]"#)
        );
    }

    #[test]
    fn lenient_integer_parse_failures_are_value_mismatches() {
        let err = mapper()
            .deserialize(&Value::from("abc"), &IntegerType::new(false).into())
            .unwrap_err();
        assert!(err.is_value_mismatch());
    }

    #[rstest]
    #[case(DecimalType::float(), Value::from(10), Value::Float(10.0))]
    #[case(DecimalType::float().with_strict(false), Value::from("10.234"), Value::Float(10.234))]
    #[case(DecimalType::decimal(), Value::from("10.234"), Value::Decimal(Decimal::new(10234, 3)))]
    #[case(DecimalType::decimal(), Value::from(10), Value::Decimal(Decimal::from(10)))]
    fn decimals_deserialize(
        #[case] datatype: DecimalType,
        #[case] input: Value,
        #[case] expected: Value,
    ) {
        assert_eq!(mapper().deserialize(&input, &datatype.into()).unwrap(), expected);
    }

    #[test]
    fn strict_float_decimals_reject_text() {
        let err = mapper()
            .deserialize(&Value::from("10.234"), &DecimalType::float().into())
            .unwrap_err();
        assert_eq!(err.to_string(), r#"at $: expected "Decimal", got "string""#);
    }

    #[test]
    fn decimal_rendering_follows_options() {
        let datatype = Datatype::from(DecimalType::decimal());
        let value = Value::Decimal(Decimal::new(10234, 3));

        assert_eq!(mapper().serialize(&value, &datatype).unwrap(), Value::from("10.234"));
        assert_eq!(
            mapper().serialize(&Value::from(10.5), &DecimalType::float().into()).unwrap(),
            Value::Float(10.5)
        );

        let as_string = mapper_with(JsonOptions {
            decimal_as_string: true,
            ..JsonOptions::default()
        });
        assert_eq!(as_string.serialize(&value, &datatype).unwrap(), Value::from("10.234"));

        let native = mapper_with(JsonOptions {
            supports_decimal: true,
            ..JsonOptions::default()
        });
        assert_eq!(native.serialize(&value, &datatype).unwrap(), value);
    }

    #[test]
    fn enum_members() {
        let pet = Datatype::from(EnumType::new("Pet", ["CAT", "DOG"]));
        let mapper = mapper();
        assert_eq!(mapper.deserialize(&Value::from("CAT"), &pet).unwrap(), Value::from("CAT"));
        let err = mapper.deserialize(&Value::from("DOGGO"), &pet).unwrap_err();
        assert!(err.is_value_mismatch());
        assert_eq!(
            err.to_string(),
            r#"at $: "DOGGO" is not a valid enumeration value for Pet"#
        );
        assert!(mapper.serialize(&Value::from(1), &pet).unwrap_err().is_type_mismatch());
    }
}
