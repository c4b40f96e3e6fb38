use std::fmt;

use tracing::debug;

use crate::datatype::{Datatype, DatatypeKind};
use crate::decoration::Decorations;
use crate::error::{Error, MapperError};
use crate::location::Location;
use crate::mapper::{Context, ConverterRegistry, Deserializer, Direction, Module, Serializer};
use crate::registry::TypeRegistry;
use crate::typedef::TypeDef;
use crate::value::Value;

/// Converts values between their in-process and wire representations.
///
/// The mapper is immutable once built and can be shared across threads.
///
/// # Examples
///
/// ```rust,ignore
/// use databind_core::{ObjectMapper, TypeDef, Value};
/// use databind_json::JsonModule;
///
/// let mapper = ObjectMapper::new(JsonModule::default());
/// let tags = mapper.deserialize_as(&Value::array(["a", "b"]), TypeDef::set_of(TypeDef::STR))?;
/// ```
pub struct ObjectMapper {
    converters: ConverterRegistry,
    types: TypeRegistry,
    modules: Vec<&'static str>,
}

impl ObjectMapper {
    /// Mapper with the converters of a single module and the builtin type
    /// registry.
    pub fn new(module: impl Module + 'static) -> Self {
        Self::builder().module(module).build()
    }

    pub fn builder() -> ObjectMapperBuilder {
        ObjectMapperBuilder::default()
    }

    pub const fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Names of the modules set up on this mapper, in setup order.
    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    // ==================== Conversions ====================

    pub fn deserialize(&self, value: &Value, datatype: &Datatype) -> Result<Value, MapperError> {
        self.convert(Direction::Deserialize, value, datatype, &Decorations::new())
    }

    /// Deserialize with call-level decorations.
    pub fn deserialize_with(
        &self,
        value: &Value,
        datatype: &Datatype,
        decorations: &Decorations,
    ) -> Result<Value, MapperError> {
        self.convert(Direction::Deserialize, value, datatype, decorations)
    }

    pub fn serialize(&self, value: &Value, datatype: &Datatype) -> Result<Value, MapperError> {
        self.convert(Direction::Serialize, value, datatype, &Decorations::new())
    }

    /// Serialize with call-level decorations.
    pub fn serialize_with(
        &self,
        value: &Value,
        datatype: &Datatype,
        decorations: &Decorations,
    ) -> Result<Value, MapperError> {
        self.convert(Direction::Serialize, value, datatype, decorations)
    }

    /// Deserialize against a native type expression.
    pub fn deserialize_as(&self, value: &Value, def: impl Into<TypeDef>) -> Result<Value, Error> {
        let datatype = self.types.translate(&def.into())?;
        Ok(self.deserialize(value, &datatype)?)
    }

    /// Serialize against a native type expression.
    pub fn serialize_as(&self, value: &Value, def: impl Into<TypeDef>) -> Result<Value, Error> {
        let datatype = self.types.translate(&def.into())?;
        Ok(self.serialize(value, &datatype)?)
    }

    /// Run a conversion in either direction.
    pub fn convert(
        &self,
        direction: Direction,
        value: &Value,
        datatype: &Datatype,
        decorations: &Decorations,
    ) -> Result<Value, MapperError> {
        let root_decorations = Decorations::new();
        let location = Location::root(value, datatype, &root_decorations);
        Context::new(self, direction, decorations).convert(&location)
    }
}

impl fmt::Debug for ObjectMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMapper")
            .field("modules", &self.modules)
            .field("converters", &self.converters)
            .field("types", &self.types.adapter_names())
            .finish()
    }
}

/// Builder for [`ObjectMapper`].
///
/// Modules and individual converters are registered in call order; a later
/// registration for the same datatype kind replaces an earlier one.
#[derive(Debug, Default)]
pub struct ObjectMapperBuilder {
    converters: ConverterRegistry,
    types: Option<TypeRegistry>,
    modules: Vec<&'static str>,
}

impl ObjectMapperBuilder {
    /// Set up a module's converters.
    #[must_use = "builder methods must be chained or built"]
    pub fn module(mut self, module: impl Module + 'static) -> Self {
        debug!(module = module.name(), "setting up mapper module");
        module.setup(&mut self.converters);
        self.modules.push(module.name());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn deserializer(
        mut self,
        kind: DatatypeKind,
        deserializer: impl Deserializer + 'static,
    ) -> Self {
        self.converters.register_deserializer(kind, deserializer);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn serializer(mut self, kind: DatatypeKind, serializer: impl Serializer + 'static) -> Self {
        self.converters.register_serializer(kind, serializer);
        self
    }

    /// Type registry used by [`ObjectMapper::deserialize_as`] and
    /// [`ObjectMapper::serialize_as`]. Defaults to the builtin adapters.
    #[must_use = "builder methods must be chained or built"]
    pub fn types(mut self, types: TypeRegistry) -> Self {
        self.types = Some(types);
        self
    }

    pub fn build(self) -> ObjectMapper {
        ObjectMapper {
            converters: self.converters,
            types: self.types.unwrap_or_default(),
            modules: self.modules,
        }
    }
}
