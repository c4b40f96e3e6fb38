//! Translation of native type expressions into datatypes.
//!
//! A [`TypeRegistry`] holds [`TypeAdapter`]s ordered by descending priority
//! (ties keep registration order). [`translate`](TypeRegistry::translate)
//! offers a [`TypeDef`] to each adapter in turn; the first adapter that
//! does not reject it wins. Adapters resolve nested expressions through the
//! resolver they are handed, so generics nest to any depth.
//!
//! Registries are plain values: build one, register custom adapters and
//! pass it where translation happens. [`TypeRegistry::builtin`] is a shared
//! read-only registry with the builtin adapters.

use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use crate::datatype::{
    BooleanType, ClassType, CollectionKind, CollectionType, Datatype, DateType, DatetimeType,
    DecimalType, IntegerType, MultiType, ObjectType, StringType,
};
use crate::error::TypeDefError;
use crate::structs::{Field, FieldSpec, StructDef};
use crate::typedef::{NativeType, TypeDef};

/// Resolves nested type expressions.
pub type Resolver<'a> = dyn Fn(&TypeDef) -> Result<Datatype, TypeDefError> + 'a;

/// Derives a datatype from the type expressions it recognises.
pub trait TypeAdapter: fmt::Debug + Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Adapters with higher priority are asked first.
    fn priority(&self) -> i32 {
        0
    }

    /// Build a datatype from `def`, or reject it with
    /// [`TypeDefError::Invalid`].
    fn from_typedef(
        &self,
        resolver: &Resolver<'_>,
        def: &TypeDef,
    ) -> Result<Datatype, TypeDefError>;
}

/// Ordered collection of type adapters. The default registry holds the
/// builtin adapters.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    adapters: Vec<Arc<dyn TypeAdapter>>,
}

static BUILTIN: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_builtin);

impl TypeRegistry {
    /// Registry without adapters.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with the builtin adapters.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(AnyAdapter);
        registry.register(BooleanAdapter);
        registry.register(StringAdapter);
        registry.register(IntegerAdapter);
        registry.register(DecimalAdapter);
        registry.register(DatetimeAdapter);
        registry.register(DateAdapter);
        registry.register(CollectionAdapter);
        registry.register(ObjectAdapter);
        registry.register(StructAdapter);
        registry.register(MultiAdapter);
        registry.register(ClassAdapter);
        registry
    }

    /// Shared registry with the builtin adapters.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Add an adapter, keeping descending priority order.
    pub fn register(&mut self, adapter: impl TypeAdapter + 'static) -> &mut Self {
        let priority = adapter.priority();
        let position = self
            .adapters
            .iter()
            .position(|existing| existing.priority() < priority)
            .unwrap_or(self.adapters.len());
        debug!(adapter = adapter.name(), priority, position, "registered type adapter");
        self.adapters.insert(position, Arc::new(adapter));
        self
    }

    /// Adapter names in the order they are consulted.
    pub fn adapter_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Translate a type expression.
    pub fn translate(&self, def: &TypeDef) -> Result<Datatype, TypeDefError> {
        if let TypeDef::Datatype(datatype) = def {
            return Ok(datatype.clone());
        }
        let resolver = |inner: &TypeDef| self.translate(inner);
        for adapter in &self.adapters {
            match adapter.from_typedef(&resolver, def) {
                Ok(datatype) => {
                    trace!(adapter = adapter.name(), %def, %datatype, "translated type definition");
                    return Ok(datatype);
                }
                Err(TypeDefError::Invalid { .. }) => {}
                Err(other) => return Err(other),
            }
        }
        Err(TypeDefError::invalid(def))
    }

    /// Translate a type expression, falling back to `fallback` when no
    /// adapter accepts it.
    pub fn translate_or(&self, def: &TypeDef, fallback: Datatype) -> Datatype {
        self.translate(def).unwrap_or(fallback)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

// ==================== Builtin adapters ====================

macro_rules! native_adapter {
    ($adapter:ident, $name:literal, { $($native:pat => $datatype:expr),* $(,)? }) => {
        #[derive(Debug)]
        struct $adapter;

        impl TypeAdapter for $adapter {
            fn name(&self) -> &'static str {
                $name
            }

            fn from_typedef(
                &self,
                _: &Resolver<'_>,
                def: &TypeDef,
            ) -> Result<Datatype, TypeDefError> {
                match def {
                    $(TypeDef::Native($native) => Ok($datatype.into()),)*
                    other => Err(TypeDefError::invalid(other)),
                }
            }
        }
    };
}

native_adapter!(BooleanAdapter, "Boolean", { NativeType::Bool => BooleanType::default() });
native_adapter!(StringAdapter, "String", { NativeType::Str => StringType::default() });
native_adapter!(IntegerAdapter, "Integer", { NativeType::Int => IntegerType::default() });
native_adapter!(DecimalAdapter, "Decimal", {
    NativeType::Float => DecimalType::float(),
    NativeType::Decimal => DecimalType::decimal(),
});
native_adapter!(DatetimeAdapter, "Datetime", { NativeType::Datetime => DatetimeType });
native_adapter!(DateAdapter, "Date", { NativeType::Date => DateType });

#[derive(Debug)]
struct AnyAdapter;

impl TypeAdapter for AnyAdapter {
    fn name(&self) -> &'static str {
        "Any"
    }

    fn from_typedef(&self, _: &Resolver<'_>, def: &TypeDef) -> Result<Datatype, TypeDefError> {
        match def {
            TypeDef::Native(NativeType::Object) | TypeDef::TypeVar(_) => Ok(Datatype::Any),
            other => Err(TypeDefError::invalid(other)),
        }
    }
}

#[derive(Debug)]
struct CollectionAdapter;

impl TypeAdapter for CollectionAdapter {
    fn name(&self) -> &'static str {
        "Collection"
    }

    fn from_typedef(
        &self,
        resolver: &Resolver<'_>,
        def: &TypeDef,
    ) -> Result<Datatype, TypeDefError> {
        let (item, container) = match def {
            TypeDef::Native(NativeType::List) => (None, CollectionKind::List),
            TypeDef::Native(NativeType::Set) => (None, CollectionKind::Set),
            TypeDef::ListLiteral(items) if items.len() <= 1 => {
                (items.first(), CollectionKind::List)
            }
            TypeDef::SetLiteral(items) if items.len() == 1 => (items.first(), CollectionKind::Set),
            TypeDef::List(item) => (Some(item.as_ref()), CollectionKind::List),
            TypeDef::Set(item) => (Some(item.as_ref()), CollectionKind::Set),
            other => return Err(TypeDefError::invalid(other)),
        };
        let item_type = match item {
            Some(item) => resolver(item)?,
            None => Datatype::Any,
        };
        Ok(CollectionType::new(item_type, container).into())
    }
}

#[derive(Debug)]
struct ObjectAdapter;

impl TypeAdapter for ObjectAdapter {
    fn name(&self) -> &'static str {
        "Object"
    }

    fn from_typedef(
        &self,
        resolver: &Resolver<'_>,
        def: &TypeDef,
    ) -> Result<Datatype, TypeDefError> {
        match def {
            TypeDef::Native(NativeType::Dict) => Ok(ObjectType::any().into()),
            TypeDef::MapLiteral(entries) => match entries.as_slice() {
                [] => Ok(ObjectType::any().into()),
                [(key, value)] if key == "value_type" => {
                    Ok(ObjectType::new(resolver(value)?).into())
                }
                _ => Err(TypeDefError::invalid(def)),
            },
            TypeDef::Dict(key, value) => match resolver(key)? {
                Datatype::String(_) => Ok(ObjectType::new(resolver(value)?).into()),
                _ => Err(TypeDefError::InvalidParameter {
                    datatype: "Object",
                    message: format!("keys must be strings, got {key}"),
                }),
            },
            other => Err(TypeDefError::invalid(other)),
        }
    }
}

#[derive(Debug)]
struct StructAdapter;

impl TypeAdapter for StructAdapter {
    fn name(&self) -> &'static str {
        "Struct"
    }

    fn from_typedef(
        &self,
        resolver: &Resolver<'_>,
        def: &TypeDef,
    ) -> Result<Datatype, TypeDefError> {
        match def {
            TypeDef::Struct(def) => Ok(def.datatype()),
            TypeDef::MapLiteral(entries) => {
                let fields = entries
                    .iter()
                    .map(|(name, def)| Ok(Field::new(resolver(def)?).named(name.clone())))
                    .collect::<Result<Vec<_>, TypeDefError>>()?;
                let spec = FieldSpec::new(fields).map_err(|e| TypeDefError::InvalidParameter {
                    datatype: "Struct",
                    message: e.to_string(),
                })?;
                Ok(StructDef::inline(spec).datatype())
            }
            other => Err(TypeDefError::invalid(other)),
        }
    }
}

#[derive(Debug)]
struct MultiAdapter;

impl TypeAdapter for MultiAdapter {
    fn name(&self) -> &'static str {
        "Multi"
    }

    fn from_typedef(
        &self,
        resolver: &Resolver<'_>,
        def: &TypeDef,
    ) -> Result<Datatype, TypeDefError> {
        match def {
            TypeDef::Tuple(members) if !members.is_empty() => {
                let types = members
                    .iter()
                    .map(resolver)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MultiType::new(types).into())
            }
            other => Err(TypeDefError::invalid(other)),
        }
    }
}

/// Lowest priority, so builtin shapes are never taken for native classes.
#[derive(Debug)]
struct ClassAdapter;

impl TypeAdapter for ClassAdapter {
    fn name(&self) -> &'static str {
        "Class"
    }

    fn priority(&self) -> i32 {
        -1000
    }

    fn from_typedef(&self, _: &Resolver<'_>, def: &TypeDef) -> Result<Datatype, TypeDefError> {
        match def {
            TypeDef::Class(class) => Ok(Datatype::Class(ClassType::clone(class))),
            other => Err(TypeDefError::invalid(other)),
        }
    }
}
