//! Ordered field collections.
//!
//! Every declaration surface (explicit fields, annotations, class members,
//! list definitions) produces [`Field`]s and hands them to
//! [`FieldSpec::new`], which owns ordering and validation.

use indexmap::IndexMap;

use crate::datatype::Datatype;
use crate::error::FieldError;
use crate::registry::TypeRegistry;
use crate::structs::field::{Field, FieldDefault};
use crate::typedef::TypeDef;
use crate::value::Value;

/// An annotation-style declaration: `name: def = default`.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: String,
    pub def: TypeDef,
    pub default: FieldDefault,
}

impl Annotation {
    pub fn new(name: impl Into<String>, def: impl Into<TypeDef>) -> Self {
        Self {
            name: name.into(),
            def: def.into(),
            default: FieldDefault::NotSet,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    fn into_field(self, registry: &TypeRegistry) -> Result<Field, FieldError> {
        let field = Field::from_typedef_in(self.def, registry).map_err(|e| match e {
            FieldError::TypeDef { source, .. } => FieldError::TypeDef {
                name: Some(self.name.clone()),
                source,
            },
            other => other,
        })?;
        Ok(field.named(self.name).with_default(self.default))
    }
}

/// One entry of a list definition.
#[derive(Debug, Clone)]
pub enum ListItem {
    /// A field of any type.
    Name(String),
    /// `(name, type)`.
    Typed(String, TypeDef),
    /// `(name, type, default)`.
    Defaulted(String, TypeDef, Value),
    /// A named field.
    Field(Field),
}

impl From<&str> for ListItem {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<Field> for ListItem {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl<S: Into<String>> From<(S, TypeDef)> for ListItem {
    fn from((name, def): (S, TypeDef)) -> Self {
        Self::Typed(name.into(), def)
    }
}

impl<S: Into<String>, V: Into<Value>> From<(S, TypeDef, V)> for ListItem {
    fn from((name, def, default): (S, TypeDef, V)) -> Self {
        Self::Defaulted(name.into(), def, default.into())
    }
}

/// Ordered, name-unique collection of fields.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    fields: IndexMap<String, Field>,
}

impl FieldSpec {
    /// Build from named fields, ordered by creation index. A later field
    /// with a duplicate name replaces the earlier one in place.
    pub fn new<I>(fields: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = Field>,
    {
        let mut fields: Vec<Field> = fields.into_iter().collect();
        fields.sort_by_key(Field::index);
        let mut map = IndexMap::with_capacity(fields.len());
        for field in fields {
            field.validate()?;
            let name = field.name().ok_or(FieldError::Unnamed)?.to_owned();
            map.insert(name, field);
        }
        Ok(Self { fields: map })
    }

    /// Build from a `key -> field` mapping. Unnamed fields take their key;
    /// named fields must match it.
    pub fn from_map<I, K>(entries: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        let fields = entries
            .into_iter()
            .map(|(key, mut field)| {
                let key = key.into();
                match field.name() {
                    None => field.set_name(key)?,
                    Some(name) if name != key => {
                        return Err(FieldError::NameMismatch {
                            key,
                            name: name.to_owned(),
                        });
                    }
                    Some(_) => {}
                }
                Ok(field)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }

    /// Build from annotation-style declarations, in the given order.
    pub fn from_annotations<I>(annotations: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = Annotation>,
    {
        Self::from_annotations_in(annotations, TypeRegistry::builtin())
    }

    pub fn from_annotations_in<I>(
        annotations: I,
        registry: &TypeRegistry,
    ) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = Annotation>,
    {
        let fields = annotations
            .into_iter()
            .map(|a| a.into_field(registry))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }

    /// Build from class-member style declarations. Same rules as
    /// [`from_map`](Self::from_map).
    pub fn from_members<I, K>(members: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        Self::from_map(members)
    }

    /// Build from a list definition: bare names, `(name, type)`,
    /// `(name, type, default)` tuples or named fields.
    pub fn from_list_def<I, T>(items: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ListItem>,
    {
        let registry = TypeRegistry::builtin();
        let fields = items
            .into_iter()
            .map(|item| match item.into() {
                ListItem::Name(name) => Ok(Field::new(Datatype::Any).named(name)),
                ListItem::Typed(name, def) => Annotation::new(name, def).into_field(registry),
                ListItem::Defaulted(name, def, default) => Annotation::new(name, def)
                    .with_default(default)
                    .into_field(registry),
                ListItem::Field(field) => Ok(field),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }

    /// Any-typed fields from names separated by commas, or by whitespace
    /// when the text has no comma: `"x, y"` and `"x y"` both declare `x`
    /// and `y`.
    pub fn from_names(names: &str) -> Result<Self, FieldError> {
        let names: Vec<&str> = if names.contains(',') {
            names.split(',').map(str::trim).collect()
        } else {
            names.split_whitespace().collect()
        };
        if names.iter().any(|name| name.is_empty()) {
            return Err(FieldError::Unnamed);
        }
        Self::from_list_def(names)
    }

    // ==================== Queries ====================

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in ascending priority order; ties keep declaration order.
    pub fn by_priority(&self) -> Vec<(&str, &Field)> {
        let mut fields: Vec<_> = self.iter().collect();
        fields.sort_by_key(|(_, field)| field.priority());
        fields
    }

    /// Merge `other` into this spec. Fields with existing names are
    /// replaced in place; new fields are appended in their order.
    pub fn update(&mut self, other: &Self) -> &mut Self {
        for (name, field) in &other.fields {
            self.fields.insert(name.clone(), field.clone());
        }
        self
    }
}

impl<'a> IntoIterator for &'a FieldSpec {
    type Item = (&'a String, &'a Field);
    type IntoIter = indexmap::map::Iter<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{IntegerType, StringType};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn names(spec: &FieldSpec) -> Vec<&str> {
        spec.names().collect()
    }

    #[test]
    fn creation_order_wins_over_input_order() {
        let a = Field::new(IntegerType::default()).named("a");
        let b = Field::new(IntegerType::default()).named("b");
        let spec = FieldSpec::new([b, a]).unwrap();
        assert_eq!(names(&spec), ["a", "b"]);
    }

    #[test]
    fn from_map_assigns_and_checks_names() {
        let spec = FieldSpec::from_map([("x", Field::new(Datatype::Any))]).unwrap();
        assert_eq!(spec.get("x").and_then(Field::name), Some("x"));
        let err = FieldSpec::from_map([("x", Field::new(Datatype::Any).named("y"))]).unwrap_err();
        assert!(matches!(err, FieldError::NameMismatch { .. }));
    }

    #[test]
    fn unnamed_fields_are_rejected() {
        assert_eq!(
            FieldSpec::new([Field::new(Datatype::Any)]).unwrap_err(),
            FieldError::Unnamed
        );
    }

    #[test]
    fn update_keeps_overridden_positions() {
        let mut base = FieldSpec::new([
            Field::new(IntegerType::default()).named("a"),
            Field::new(IntegerType::default()).named("b"),
        ])
        .unwrap();
        let own = FieldSpec::new([
            Field::new(StringType::default()).named("c"),
            Field::new(StringType::default()).named("a"),
        ])
        .unwrap();
        base.update(&own);
        assert_eq!(names(&base), ["a", "b", "c"]);
        assert_eq!(
            base.get("a").map(Field::datatype),
            Some(&Datatype::from(StringType::default()))
        );
    }

    #[test]
    fn both_surfaces_produce_the_same_spec() {
        let annotated = FieldSpec::from_annotations([
            Annotation::new("name", TypeDef::STR),
            Annotation::new("age", TypeDef::INT).with_default(0),
        ])
        .unwrap();
        let listed = FieldSpec::from_list_def([
            ListItem::from(("name", TypeDef::STR)),
            ListItem::from(("age", TypeDef::INT, 0)),
        ])
        .unwrap();
        assert_eq!(names(&annotated), names(&listed));
        for ((_, a), (_, b)) in annotated.iter().zip(listed.iter()) {
            assert_eq!(a.datatype(), b.datatype());
            assert_eq!(a.default_now(), b.default_now());
            assert_eq!(a.is_nullable(), b.is_nullable());
        }
    }

    #[test]
    fn bare_names_are_any_typed() {
        let spec = FieldSpec::from_list_def(["a", "b"]).unwrap();
        assert_eq!(spec.get("a").map(Field::datatype), Some(&Datatype::Any));
        assert_eq!(spec.len(), 2);
    }

    #[rstest]
    #[case("x, y,z")]
    #[case("x  y\tz")]
    fn names_split_on_commas_or_whitespace(#[case] names: &str) {
        let spec = FieldSpec::from_names(names).unwrap();
        let declared: Vec<_> = spec.iter().map(|(name, _)| name).collect();
        assert_eq!(declared, ["x", "y", "z"]);
        assert_eq!(spec.get("y").map(Field::datatype), Some(&Datatype::Any));
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(FieldSpec::from_names("x,,y").unwrap_err(), FieldError::Unnamed);
    }

    #[test]
    fn priority_order_is_stable() {
        let spec = FieldSpec::new([
            Field::new(Datatype::Any).named("late").with_priority(10),
            Field::new(Datatype::Any).named("x"),
            Field::new(Datatype::Any).named("y"),
        ])
        .unwrap();
        let order: Vec<_> = spec.by_priority().into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, ["x", "y", "late"]);
    }
}
