use std::collections::HashSet;

use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{
    Context, Field, InheritKey, Location, MapperError, Object, Raw, Remainder, SkipDefaults,
    StructDef, Value,
};

use crate::converters::expect_datatype;
use crate::decoration::{JsonDeserializer, JsonFieldName, JsonRequired, JsonSerializer};
use crate::options::JsonOptions;

/// JSON key of a field.
fn json_key<'f>(name: &'f str, field: &'f Field) -> &'f str {
    field
        .decorations()
        .first::<JsonFieldName>()
        .map_or(name, JsonFieldName::name)
}

fn missing_member(location: &Location<'_>, key: &str, def: &StructDef) -> MapperError {
    location.value_mismatch(format!("missing member {key:?} for {} object", def.name()))
}

/// Struct instances as JSON objects.
///
/// A [`JsonDeserializer`] or [`JsonSerializer`] hook on the field or on the
/// struct definition runs first; when it declines, fields are mapped one by
/// one.
pub(crate) struct StructConverter {
    strict_structs: bool,
}

impl StructConverter {
    pub(crate) const fn new(options: &JsonOptions) -> Self {
        Self {
            strict_structs: options.strict_structs,
        }
    }
}

impl Deserializer for StructConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let datatype = expect_datatype!(location, Struct);
        let def = datatype.def();

        let hook = location
            .decoration::<JsonDeserializer>()
            .or_else(|| def.decoration::<JsonDeserializer>());
        if let Some(hook) = hook {
            if let Some(value) = hook.call(ctx, location)? {
                return Ok(value);
            }
        }

        let payload = location.value().as_object().ok_or_else(|| location.type_mismatch())?;
        let mut consumed: HashSet<&str> =
            datatype.ignore_keys().iter().map(String::as_str).collect();
        let mut values = Object::with_capacity(def.fields().len());

        for (name, field) in def.fields().by_priority() {
            let decorations = field.decorations();
            let value = if decorations.has::<Raw>() {
                location.value().clone()
            } else if decorations.has::<InheritKey>() {
                location.key().map_or(Value::Null, Value::from)
            } else if decorations.has::<Remainder>() {
                let remaining: Object = payload
                    .iter()
                    .filter(|(key, _)| !consumed.contains(key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                consumed.extend(payload.keys().map(String::as_str));
                let remaining = Value::Object(remaining);
                ctx.convert(&location.alongside(&remaining, field.datatype(), decorations))?
            } else {
                let key = json_key(name, field);
                let present = if datatype.is_ignored(key) {
                    None
                } else {
                    payload.get_key_value(key)
                };
                match present {
                    Some((key, raw)) => {
                        consumed.insert(key.as_str());
                        if raw.is_null() && field.is_nullable() {
                            Value::Null
                        } else {
                            ctx.convert_child(
                                location,
                                key.as_str(),
                                raw,
                                field.datatype(),
                                decorations,
                            )?
                        }
                    }
                    None if decorations.has::<JsonRequired>() => {
                        return Err(missing_member(location, key, def));
                    }
                    None => match field.default_now() {
                        Some(default) => default,
                        None if field.is_nullable() => Value::Null,
                        None => return Err(missing_member(location, key, def)),
                    },
                }
            };
            values.insert(name.to_owned(), value);
        }

        if def.is_strict() || self.strict_structs {
            let mut extra: Vec<&str> = payload
                .keys()
                .map(String::as_str)
                .filter(|key| !consumed.contains(key))
                .collect();
            if !extra.is_empty() {
                extra.sort_unstable();
                return Err(location.value_mismatch(format!(
                    "strict object type {:?} does not allow additional keys on extract, \
                     but found {extra:?}",
                    def.name()
                )));
            }
        }

        Ok(Value::Struct(def.assemble(values)))
    }
}

impl Serializer for StructConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let datatype = expect_datatype!(location, Struct);
        let def = datatype.def();

        let hook = location
            .decoration::<JsonSerializer>()
            .or_else(|| def.decoration::<JsonSerializer>());
        if let Some(hook) = hook {
            if let Some(value) = hook.call(ctx, location)? {
                return Ok(value);
            }
        }

        let instance = match location.value() {
            Value::Struct(instance) if instance.def().inherits_from(def) => instance,
            _ => return Err(location.type_mismatch()),
        };
        let skip_defaults = ctx.decoration::<SkipDefaults>(location).is_some()
            || def.decoration::<SkipDefaults>().is_some();

        let null = Value::Null;
        let mut out = Object::with_capacity(def.fields().len());
        for (name, field) in def.fields().iter() {
            if field.is_derived() {
                continue;
            }
            let key = json_key(name, field);
            if datatype.is_ignored(key) {
                continue;
            }
            let value = instance.get(name).unwrap_or(&null);
            if skip_defaults && field.default_now().is_some_and(|default| &default == value) {
                continue;
            }

            let decorations = field.decorations();
            if decorations.has::<Remainder>() {
                match ctx.convert(&location.alongside(value, field.datatype(), decorations))? {
                    Value::Object(entries) => out.extend(entries),
                    Value::Null => {}
                    _ => {
                        return Err(location.value_mismatch(format!(
                            "remainder field {name:?} of {} did not serialize to an object",
                            def.name()
                        )));
                    }
                }
                continue;
            }

            let converted = if value.is_null() && field.is_nullable() {
                Value::Null
            } else {
                ctx.convert_child(location, key, value, field.datatype(), decorations)?
            };
            out.insert(key.to_owned(), converted);
        }
        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use databind_core::{IntegerType, ObjectMapper, StringType, Strict, StructType};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::JsonModule;

    fn mapper() -> ObjectMapper {
        ObjectMapper::new(JsonModule::default())
    }

    fn point(strict: bool) -> Arc<StructDef> {
        let mut builder = StructDef::builder("Point")
            .field("x", Field::new(IntegerType::default()))
            .field("y", Field::new(IntegerType::default()).default_value(0));
        if strict {
            builder = builder.decorate(Strict);
        }
        builder.build().unwrap()
    }

    #[test]
    fn fields_take_defaults_and_extra_keys_are_ignored() {
        let def = point(false);
        let value = mapper()
            .deserialize(&Value::object([("x", 3), ("z", 9)]), &def.datatype())
            .unwrap();
        assert_eq!(value, Value::Struct(def.from_kwargs([("x", 3), ("y", 0)]).unwrap()));
    }

    #[test]
    fn strict_structs_reject_extra_keys() {
        let def = point(true);
        let err = mapper()
            .deserialize(&Value::object([("x", 3), ("b", 1), ("a", 2)]), &def.datatype())
            .unwrap_err();
        assert!(err.is_value_mismatch());
        assert_eq!(
            err.message(),
            "strict object type \"Point\" does not allow additional keys on extract, \
             but found [\"a\", \"b\"]"
        );
    }

    #[test]
    fn strictness_can_come_from_options() {
        let mapper = ObjectMapper::new(JsonModule::with_options(JsonOptions {
            strict_structs: true,
            ..JsonOptions::default()
        }));
        let err = mapper
            .deserialize(&Value::object([("x", 3), ("z", 9)]), &point(false).datatype())
            .unwrap_err();
        assert!(err.is_value_mismatch());
    }

    #[test]
    fn missing_members_name_the_json_key() {
        let def = StructDef::builder("Item")
            .field(
                "item_id",
                Field::new(StringType::default()).decorate(JsonFieldName::new("itemId")),
            )
            .build()
            .unwrap();
        let err = mapper()
            .deserialize(&Value::object([("item_id", "a")]), &def.datatype())
            .unwrap_err();
        assert_eq!(err.to_string(), r#"at $: missing member "itemId" for Item object"#);

        let value = mapper()
            .deserialize(&Value::object([("itemId", "a")]), &def.datatype())
            .unwrap();
        assert_eq!(value.get("item_id"), Some(&Value::from("a")));
        assert_eq!(
            mapper().serialize(&value, &def.datatype()).unwrap(),
            Value::object([("itemId", "a")])
        );
    }

    #[test]
    fn required_keys_must_be_present_despite_defaults() {
        let def = StructDef::builder("Page")
            .field(
                "size",
                Field::new(IntegerType::default()).default_value(10).decorate(JsonRequired),
            )
            .build()
            .unwrap();
        let empty = Value::object(Vec::<(&str, Value)>::new());
        let err = mapper().deserialize(&empty, &def.datatype());
        assert_eq!(err.unwrap_err().message(), r#"missing member "size" for Page object"#);
    }

    #[test]
    fn missing_nullable_fields_become_null() {
        let def = StructDef::builder("Note")
            .field("text", Field::new(StringType::default()).nullable(true))
            .build()
            .unwrap();
        let value = mapper()
            .deserialize(&Value::object(Vec::<(&str, Value)>::new()), &def.datatype())
            .unwrap();
        assert_eq!(value.get("text"), Some(&Value::Null));
    }

    #[test]
    fn ignored_keys_are_neither_read_nor_written() {
        let def = StructDef::builder("Tagged")
            .field("type", Field::new(StringType::default()).nullable(true))
            .decorate(Strict)
            .build()
            .unwrap();
        let datatype = StructType::new(Arc::clone(&def)).with_ignore_keys(["type"]).into();
        let value = mapper().deserialize(&Value::object([("type", "a")]), &datatype).unwrap();
        assert_eq!(value.get("type"), Some(&Value::Null));
        assert_eq!(
            mapper().serialize(&value, &datatype).unwrap(),
            Value::object(Vec::<(&str, Value)>::new())
        );
    }

    #[test]
    fn hooks_run_first_and_may_decline() {
        let def = StructDef::builder("Version")
            .field("major", Field::new(IntegerType::default()))
            .decorate(JsonDeserializer::new(|_, location| {
                Ok(location.value().as_i64().map(|major| {
                    Value::object([("major", major)])
                }))
            }))
            .build()
            .unwrap();
        let mapper = mapper();
        assert_eq!(
            mapper.deserialize(&Value::from(2), &def.datatype()).unwrap(),
            Value::object([("major", 2)])
        );
        let mapped = mapper
            .deserialize(&Value::object([("major", 3)]), &def.datatype())
            .unwrap();
        assert_eq!(mapped.get("major"), Some(&Value::from(3)));
    }

    #[test]
    fn serializing_a_foreign_value_is_a_type_mismatch() {
        let err = mapper()
            .serialize(&Value::object([("x", 1)]), &point(false).datatype())
            .unwrap_err();
        assert!(err.is_type_mismatch());
    }
}
