//! `serde_json` entry points.

use chrono::NaiveDate;
use databind_core::{
    Annotation, DateType, Datatype, IntegerType, ObjectMapper, ObjectType, StructDef, TypeDef,
    Value,
};
use databind_json::{JsonError, JsonMapperExt, JsonModule, JsonOptions, json_class, JsonClass};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn mapper() -> ObjectMapper {
    ObjectMapper::new(JsonModule::default())
}

#[test]
fn struct_text_round_trip() {
    let def = StructDef::builder("Event")
        .annotated(Annotation::new("title", TypeDef::STR))
        .annotated(Annotation::new("on", TypeDef::DATE))
        .annotated(
            Annotation::new("tags", TypeDef::list_of(TypeDef::STR))
                .with_default(Value::array(Vec::<Value>::new())),
        )
        .build()
        .unwrap();
    let mapper = mapper();

    let event = mapper
        .from_json_str(r#"{"title": "launch", "on": "2024-05-01"}"#, &def.datatype())
        .unwrap();
    assert_eq!(
        event.get("on"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()))
    );
    assert_eq!(
        mapper.to_json_string(&event, &def.datatype()).unwrap(),
        r#"{"title":"launch","on":"2024-05-01","tags":[]}"#
    );
}

#[test]
fn native_type_expressions_are_translated() {
    let value = mapper()
        .from_json_str_as(r#"{"a": [1, 2]}"#, TypeDef::dict_of(TypeDef::list_of(TypeDef::INT)))
        .unwrap();
    assert_eq!(value, Value::object([("a", Value::array([1, 2]))]));
}

#[test]
fn errors_are_classified() {
    let mapper = mapper();
    let datatype = Datatype::from(IntegerType::default());

    let err = mapper.from_json_str("{", &datatype).unwrap_err();
    assert!(matches!(err, JsonError::Syntax(_)));
    assert_eq!(err.code(), "syntax");

    let err = mapper.from_json_str(r#""7""#, &datatype).unwrap_err();
    assert_eq!(err.code(), "type_mismatch");
    assert_eq!(err.to_string(), r#"at $: expected "Integer", got "string""#);

    let err = mapper.from_json_str_as("1", TypeDef::tuple(Vec::<TypeDef>::new())).unwrap_err();
    assert_eq!(err.code(), "invalid_type_def");
}

#[derive(Debug, PartialEq)]
struct Version(u32, u32);

impl JsonClass for Version {
    fn to_json(&self) -> Value {
        Value::from(format!("{}.{}", self.0, self.1))
    }

    fn from_json(value: &Value) -> Option<Self> {
        let (major, minor) = value.as_str()?.split_once('.')?;
        Some(Self(major.parse().ok()?, minor.parse().ok()?))
    }
}

#[test]
fn class_codecs_work_inside_containers() {
    let datatype = Datatype::from(ObjectType::new(json_class::<Version>()));
    let mapper = mapper();
    let value = mapper.from_json_str(r#"{"serde": "1.0"}"#, &datatype).unwrap();
    assert_eq!(value, Value::object([("serde", Value::native(Version(1, 0)))]));
    assert_eq!(mapper.to_json_string(&value, &datatype).unwrap(), r#"{"serde":"1.0"}"#);
}

#[test]
fn decimal_options_reach_json_text() {
    let mapper = ObjectMapper::new(JsonModule::with_options(JsonOptions {
        decimal_as_string: true,
        ..JsonOptions::default()
    }));
    let datatype = mapper.types().translate(&TypeDef::DECIMAL).unwrap();
    let value = mapper.from_json_str(r#""10.50""#, &datatype).unwrap();
    assert_eq!(mapper.to_json_string(&value, &datatype).unwrap(), r#""10.50""#);
}

#[test]
fn unparseable_dates_are_value_mismatches() {
    let err = mapper()
        .from_json_str(r#""01/05/2024""#, &DateType.into())
        .unwrap_err();
    assert_eq!(err.code(), "value_mismatch");
}

proptest! {
    #[test]
    fn integer_maps_keep_every_entry(
        entries in prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..16)
    ) {
        let text = serde_json::to_string(&serde_json::Value::Object(
            entries.iter().map(|(k, v)| (k.clone(), serde_json::Value::from(*v))).collect(),
        )).unwrap();
        let datatype = Datatype::from(ObjectType::new(IntegerType::default()));
        let mapper = mapper();

        let value = mapper.from_json_str(&text, &datatype).unwrap();
        prop_assert_eq!(mapper.to_json_string(&value, &datatype).unwrap(), text);
    }
}
