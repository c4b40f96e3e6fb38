//! Struct fields.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::datatype::Datatype;
use crate::decoration::{Decoration, Decorations, InheritKey, Raw, Remainder};
use crate::error::FieldError;
use crate::registry::TypeRegistry;
use crate::typedef::TypeDef;
use crate::value::Value;

/// Priority of [`Remainder`] fields. Fields are processed in ascending
/// priority order, so remainders see which keys their peers consumed.
pub const REMAINDER_PRIORITY: i32 = 1000;

static NEXT_INDEX: AtomicU64 = AtomicU64::new(0);

/// Produces a fresh default value on every call.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default of a field.
#[derive(Clone, Default)]
pub enum FieldDefault {
    /// The field is required.
    #[default]
    NotSet,
    Value(Value),
    Factory(DefaultFactory),
}

impl FieldDefault {
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::NotSet)
    }

    /// Compute the default value. Factories run on every call.
    pub fn get(&self) -> Option<Value> {
        match self {
            Self::NotSet => None,
            Self::Value(value) => Some(value.clone()),
            Self::Factory(factory) => Some(factory()),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSet => f.write_str("NotSet"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// One named, typed attribute of a struct.
///
/// Every field records a process-wide creation index; field specs order
/// fields by it, so declaration order survives any intermediate map.
#[derive(Clone)]
pub struct Field {
    name: Option<String>,
    datatype: Datatype,
    nullable: Option<bool>,
    optional: bool,
    default: FieldDefault,
    decorations: Decorations,
    priority: Option<i32>,
    derived: bool,
    index: u64,
}

impl Field {
    /// Field of an already resolved datatype.
    pub fn new(datatype: impl Into<Datatype>) -> Self {
        Self {
            name: None,
            datatype: datatype.into(),
            nullable: None,
            optional: false,
            default: FieldDefault::NotSet,
            decorations: Decorations::new(),
            priority: None,
            derived: false,
            index: NEXT_INDEX.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Field of a native type expression, translated with the builtin
    /// registry. `Optional[T]` makes the field nullable.
    pub fn from_typedef(def: impl Into<TypeDef>) -> Result<Self, FieldError> {
        Self::from_typedef_in(def, TypeRegistry::builtin())
    }

    /// Like [`from_typedef`](Self::from_typedef) with an explicit registry.
    pub fn from_typedef_in(
        def: impl Into<TypeDef>,
        registry: &TypeRegistry,
    ) -> Result<Self, FieldError> {
        let def = def.into();
        let (def, optional) = match def {
            TypeDef::Optional(inner) => (*inner, true),
            other => (other, false),
        };
        let datatype = registry
            .translate(&def)
            .map_err(|source| FieldError::TypeDef { name: None, source })?;
        let mut field = Self::new(datatype);
        field.optional = optional;
        Ok(field)
    }

    // ==================== Builder ====================

    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Default computed by `factory` each time it is needed.
    #[must_use = "builder methods must be chained or built"]
    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = FieldDefault::Factory(Arc::new(factory));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn decorate(mut self, decoration: impl Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Mark the field as derived: it is filled during deserialization but
    /// never serialized.
    #[must_use = "builder methods must be chained or built"]
    pub fn derived(mut self, derived: bool) -> Self {
        self.derived = derived;
        self
    }

    /// Name the field. Fails if it already has a name.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FieldError> {
        let name = name.into();
        if let Some(current) = &self.name {
            return Err(FieldError::NameAlreadySet {
                current: current.clone(),
                requested: name,
            });
        }
        self.name = Some(name);
        Ok(())
    }

    // ==================== Accessors ====================

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub const fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub const fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub const fn has_default(&self) -> bool {
        self.default.is_set()
    }

    /// Compute the default value, if any.
    pub fn default_now(&self) -> Option<Value> {
        self.default.get()
    }

    /// Creation index.
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Explicit nullability, or inferred from an `Optional` type or a null
    /// default.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or_else(|| {
            self.optional || matches!(self.default, FieldDefault::Value(Value::Null))
        })
    }

    /// Processing priority; lower values are processed first.
    pub fn priority(&self) -> i32 {
        self.priority.unwrap_or_else(|| {
            if self.decorations.has::<Remainder>() {
                REMAINDER_PRIORITY
            } else {
                0
            }
        })
    }

    /// Derived fields are filled from context and never serialized.
    pub fn is_derived(&self) -> bool {
        self.derived || self.decorations.has::<Raw>() || self.decorations.has::<InheritKey>()
    }

    /// Check the declaration for contradictions.
    pub fn validate(&self) -> Result<(), FieldError> {
        let name = || self.name.clone().unwrap_or_default();
        if self.optional && self.nullable.is_some() {
            return Err(FieldError::NullableWithOptional { name: name() });
        }
        if self.nullable == Some(false)
            && matches!(self.default, FieldDefault::Value(Value::Null))
        {
            return Err(FieldError::NullDefaultNotNullable { name: name() });
        }
        Ok(())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("datatype", &self.datatype.to_string())
            .field("nullable", &self.is_nullable())
            .field("default", &self.default)
            .field("decorations", &self.decorations)
            .finish()
    }
}
