//! Struct definitions.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::datatype::{Datatype, StructType};
use crate::decoration::{Decoration, Decorations, Strict};
use crate::error::{FieldError, StructError};
use crate::structs::field::Field;
use crate::structs::spec::{Annotation, FieldSpec, ListItem};
use crate::structs::value::StructValue;
use crate::value::{Object, Value};

/// Name given to structs declared inline in a type expression, until the
/// enclosing field names them.
pub const INLINE_STRUCT_NAME: &str = "InlineStruct";

/// A record type: a name, an ordered field spec (including inherited
/// fields) and struct-level decorations.
pub struct StructDef {
    name: String,
    inline: bool,
    qualified_name: OnceLock<String>,
    fields: FieldSpec,
    bases: Vec<Arc<StructDef>>,
    decorations: Decorations,
}

impl StructDef {
    pub fn builder(name: impl Into<String>) -> StructBuilder {
        StructBuilder::new(name)
    }

    /// Struct from a list definition; see [`FieldSpec::from_list_def`].
    pub fn create<I, T>(name: impl Into<String>, items: I) -> Result<Arc<Self>, FieldError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ListItem>,
    {
        Self::builder(name)
            .fields(FieldSpec::from_list_def(items)?)
            .build()
    }

    /// Struct of Any-typed fields named in one string, e.g. `"x, y"` or
    /// `"x y"`.
    pub fn from_field_names(name: impl Into<String>, names: &str) -> Result<Arc<Self>, FieldError> {
        Self::builder(name).fields(FieldSpec::from_names(names)?).build()
    }

    /// Anonymous struct from an inline type expression.
    pub(crate) fn inline(fields: FieldSpec) -> Arc<Self> {
        Arc::new(Self {
            name: INLINE_STRUCT_NAME.to_owned(),
            inline: true,
            qualified_name: OnceLock::new(),
            fields,
            bases: Vec::new(),
            decorations: Decorations::new(),
        })
    }

    // ==================== Accessors ====================

    /// Struct name. Inline structs are named after the field that first
    /// held them (`Parent.field`).
    pub fn name(&self) -> String {
        self.qualified_name
            .get()
            .cloned()
            .unwrap_or_else(|| self.name.clone())
    }

    pub const fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    pub fn bases(&self) -> &[Arc<StructDef>] {
        &self.bases
    }

    pub const fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// First struct-level decoration of type `T`, searching bases too.
    pub fn decoration<T: Decoration>(&self) -> Option<&T> {
        self.decorations
            .first::<T>()
            .or_else(|| self.bases.iter().find_map(|base| base.decoration::<T>()))
    }

    /// Whether unknown keys are rejected on deserialization.
    pub fn is_strict(&self) -> bool {
        self.decoration::<Strict>().is_some()
    }

    /// Whether this definition is `other` or inherits from it.
    pub fn inherits_from(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.bases.iter().any(|base| base.inherits_from(other))
    }

    /// The struct definition of a struct-typed field.
    pub fn nested_struct(&self, field: &str) -> Option<Arc<Self>> {
        match self.fields.get(field)?.datatype().resolved()? {
            Datatype::Struct(t) => Some(Arc::clone(t.def())),
            _ => None,
        }
    }

    /// Datatype of instances of this struct.
    pub fn datatype(self: &Arc<Self>) -> Datatype {
        Datatype::Struct(StructType::new(Arc::clone(self)))
    }

    pub(crate) fn propagate_name(&self, qualified_name: &str) {
        if self.inline {
            // Only the first enclosing field names the struct.
            let _ = self.qualified_name.set(qualified_name.to_owned());
        }
    }

    // ==================== Construction ====================

    /// Construct an instance from positional and keyword arguments.
    ///
    /// Positional arguments bind to fields in declaration order. Every
    /// provided value is checked (and coerced) against its field's
    /// datatype; fields are processed in priority order and missing ones
    /// take their default.
    pub fn instantiate(
        self: &Arc<Self>,
        args: Vec<Value>,
        mut kwargs: Object,
    ) -> Result<StructValue, StructError> {
        let name = self.name();
        let total = args.len() + kwargs.len();
        if total > self.fields.len() {
            return Err(StructError::TooManyArguments {
                name,
                expected: self.fields.len(),
                got: total,
            });
        }

        for ((field_name, _), arg) in self.fields.iter().zip(args) {
            if kwargs.contains_key(field_name) {
                return Err(StructError::DuplicateArgument {
                    name,
                    field: field_name.to_owned(),
                });
            }
            kwargs.insert(field_name.to_owned(), arg);
        }

        let mut values = Object::with_capacity(self.fields.len());
        for (field_name, field) in self.fields.by_priority() {
            let value = match kwargs.shift_remove(field_name) {
                Some(Value::Null) if field.is_nullable() => Value::Null,
                Some(value) => field
                    .datatype()
                    .check_value(value, false, true)
                    .map_err(|source| StructError::InvalidArgument {
                        name: name.clone(),
                        field: field_name.to_owned(),
                        source,
                    })?,
                None => field.default_now().ok_or_else(|| StructError::MissingArgument {
                    name: name.clone(),
                    field: field_name.to_owned(),
                })?,
            };
            values.insert(field_name.to_owned(), value);
        }

        if !kwargs.is_empty() {
            let mut keywords: Vec<String> = kwargs.into_keys().collect();
            keywords.sort();
            return Err(StructError::UnexpectedKeywords { name, keywords });
        }

        Ok(self.assemble(values))
    }

    /// Construct an instance from keyword arguments only.
    pub fn from_kwargs<I, K, V>(self: &Arc<Self>, kwargs: I) -> Result<StructValue, StructError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let kwargs = kwargs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.instantiate(Vec::new(), kwargs)
    }

    /// Construct an instance from positional arguments only.
    pub fn from_args<I, V>(self: &Arc<Self>, args: I) -> Result<StructValue, StructError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.instantiate(args.into_iter().map(Into::into).collect(), Object::new())
    }

    /// Build an instance from already converted field values without
    /// checking them. Values are reordered to declaration order; missing
    /// fields become null and unknown keys are dropped.
    pub fn assemble(self: &Arc<Self>, mut values: Object) -> StructValue {
        let ordered = self
            .fields
            .names()
            .map(|name| (name.to_owned(), values.shift_remove(name).unwrap_or_default()))
            .collect();
        StructValue::from_parts(Arc::clone(self), ordered)
    }
}

impl fmt::Debug for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDef")
            .field("name", &self.name())
            .field("fields", &self.fields.names().collect::<Vec<_>>())
            .field("bases", &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("decorations", &self.decorations)
            .finish()
    }
}

/// Builder for [`StructDef`].
///
/// Fields may come from explicit members, annotations and whole field
/// specs; they are merged in creation order, after the fields inherited
/// from the bases.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    bases: Vec<Arc<StructDef>>,
    fields: Vec<Field>,
    specs: Vec<FieldSpec>,
    decorations: Decorations,
    error: Option<FieldError>,
}

impl StructBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            specs: Vec::new(),
            decorations: Decorations::new(),
            error: None,
        }
    }

    fn fail(&mut self, error: FieldError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Inherit the fields and decorations of `base`.
    #[must_use = "builder methods must be chained or built"]
    pub fn inherit(mut self, base: &Arc<StructDef>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Add a class-member style field under `name`.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match field.name() {
            None => self.fields.push(field.named(name)),
            Some(existing) if existing == name => self.fields.push(field),
            Some(existing) => {
                let error = FieldError::NameMismatch {
                    key: name,
                    name: existing.to_owned(),
                };
                self.fail(error);
            }
        }
        self
    }

    /// Add an annotation-style field.
    #[must_use = "builder methods must be chained or built"]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        match FieldSpec::from_annotations([annotation]) {
            Ok(spec) => self.specs.push(spec),
            Err(error) => self.fail(error),
        }
        self
    }

    /// Add every field of `spec`.
    #[must_use = "builder methods must be chained or built"]
    pub fn fields(mut self, spec: FieldSpec) -> Self {
        self.specs.push(spec);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn decorate(mut self, decoration: impl Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    pub fn build(self) -> Result<Arc<StructDef>, FieldError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut own = self.fields;
        for spec in &self.specs {
            own.extend(spec.iter().map(|(_, field)| field.clone()));
        }
        let own = FieldSpec::new(own)?;

        let mut fields = FieldSpec::default();
        for base in &self.bases {
            fields.update(base.fields());
        }
        fields.update(&own);

        debug!(
            name = %self.name,
            fields = fields.len(),
            bases = self.bases.len(),
            "struct defined"
        );
        for (field_name, field) in own.iter() {
            field
                .datatype()
                .propagate_field_name(&format!("{}.{field_name}", self.name));
        }

        Ok(Arc::new(StructDef {
            name: self.name,
            inline: false,
            qualified_name: OnceLock::new(),
            fields,
            bases: self.bases,
            decorations: self.decorations,
        }))
    }
}

/// Create a struct from a list definition.
pub fn create_struct<I, T>(name: impl Into<String>, items: I) -> Result<Arc<StructDef>, FieldError>
where
    I: IntoIterator<Item = T>,
    T: Into<ListItem>,
{
    StructDef::create(name, items)
}
