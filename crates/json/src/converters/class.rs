use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{Context, Location, MapperError, Value};

use crate::converters::expect_datatype;
use crate::decoration::{JsonDeserializer, JsonSerializer};

/// Native classes, through the codec hooks attached to the class type or to
/// the field holding the value.
pub(crate) struct ClassConverter;

impl ClassConverter {
    fn missing_codec(ctx: &Context<'_>, location: &Location<'_>, class: &str) -> MapperError {
        MapperError::NoClassCodec {
            path: location.path().clone(),
            class: class.to_owned(),
            direction: ctx.direction(),
        }
    }
}

impl Deserializer for ClassConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let class = expect_datatype!(location, Class);
        let hook = location
            .decoration::<JsonDeserializer>()
            .or_else(|| class.decorations().first::<JsonDeserializer>())
            .ok_or_else(|| Self::missing_codec(ctx, location, class.name()))?;
        hook.call(ctx, location)?.ok_or_else(|| location.type_mismatch())
    }
}

impl Serializer for ClassConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let class = expect_datatype!(location, Class);
        let hook = location
            .decoration::<JsonSerializer>()
            .or_else(|| class.decorations().first::<JsonSerializer>())
            .ok_or_else(|| Self::missing_codec(ctx, location, class.name()))?;
        if !class.is_instance(location.value()) {
            return Err(location.value_mismatch(format!(
                "expected {} instance, got {}",
                class.name(),
                location.value().type_name()
            )));
        }
        hook.call(ctx, location)?.ok_or_else(|| location.type_mismatch())
    }
}
