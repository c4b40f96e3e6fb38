use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{
    Context, Datatype, Decorations, Location, MapperError, Object, StructType, Value,
};
use tracing::debug;

use crate::converters::expect_datatype;

/// Discriminated unions of structs.
///
/// Flat unions keep the discriminator beside the member's fields and
/// reserve its key; nested unions put the member's fields under a key named
/// after the discriminator value.
pub(crate) struct UnionConverter;

impl Deserializer for UnionConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let union = expect_datatype!(location, Union);
        let payload = location.value().as_object().ok_or_else(|| location.type_mismatch())?;
        let type_key = union.type_key();

        let name = match payload.get(type_key) {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(location.value_mismatch(format!(
                    "union type key {type_key:?} must be a string, got {}",
                    other.type_name()
                )));
            }
            None => {
                return Err(location.value_mismatch(format!("required key {type_key:?} not found")));
            }
        };
        let Some(def) = union.resolver().resolve(name) else {
            debug!(
                path = %location.path(),
                union = %location.datatype(),
                member = %name,
                "unknown union type"
            );
            return Err(location.value_mismatch(format!("unknown union type: {name:?}")));
        };

        let plain = Decorations::new();
        if union.is_nested() {
            let body = payload.get(name.as_str()).ok_or_else(|| {
                location.value_mismatch(format!("required key {name:?} not found"))
            })?;
            let member = Datatype::from(StructType::new(def));
            ctx.convert_child(location, name.as_str(), body, &member, &plain)
        } else {
            let member = Datatype::from(StructType::new(def).with_ignore_keys([type_key]));
            ctx.convert(&location.alongside(location.value(), &member, &plain))
        }
    }
}

impl Serializer for UnionConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let union = expect_datatype!(location, Union);
        let resolver = union.resolver();
        let value = location.value();

        let Some(name) = resolver.reverse(value) else {
            let message = match resolver.members() {
                Some(mut members) => {
                    members.sort();
                    format!("expected {{{}}}, got {}", members.join("|"), value.type_name())
                }
                None => format!("{} is not a member of {}", value.type_name(), location.datatype()),
            };
            return Err(location.type_mismatch_with(message));
        };
        let def = resolver.resolve(&name).ok_or_else(|| {
            location.type_mismatch_with(format!("union member {name:?} cannot be resolved"))
        })?;

        let plain = Decorations::new();
        let type_key = union.type_key();
        let mut out = Object::new();
        out.insert(type_key.to_owned(), Value::from(name.as_str()));
        if union.is_nested() {
            let member = Datatype::from(StructType::new(def));
            let body = ctx.convert_child(location, name.as_str(), value, &member, &plain)?;
            out.insert(name, body);
        } else {
            let member = Datatype::from(StructType::new(def).with_ignore_keys([type_key]));
            match ctx.convert(&location.alongside(value, &member, &plain))? {
                Value::Object(fields) => out.extend(fields),
                other => {
                    return Err(location.value_mismatch(format!(
                        "union member {name:?} serialized to {}, expected an object",
                        other.type_name()
                    )));
                }
            }
        }
        Ok(Value::Object(out))
    }
}
