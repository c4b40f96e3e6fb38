use databind_core::{ConverterRegistry, DatatypeKind, Module};

use crate::converters::{
    AnyConverter, ClassConverter, CollectionConverter, DateConverter, DatetimeConverter,
    DecimalConverter, EnumConverter, MultiConverter, ObjectConverter, ScalarConverter,
    StructConverter, UnionConverter,
};
use crate::options::JsonOptions;

/// Converters between in-process values and JSON-shaped values.
#[derive(Debug, Clone, Default)]
pub struct JsonModule {
    options: JsonOptions,
}

impl JsonModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &JsonOptions {
        &self.options
    }
}

impl Module for JsonModule {
    fn name(&self) -> &'static str {
        "json"
    }

    fn setup(&self, converters: &mut ConverterRegistry) {
        let options = &self.options;
        converters
            .register_duplex(DatatypeKind::Any, AnyConverter)
            .register_duplex(DatatypeKind::Boolean, ScalarConverter)
            .register_duplex(DatatypeKind::String, ScalarConverter)
            .register_duplex(DatatypeKind::Integer, ScalarConverter)
            .register_duplex(DatatypeKind::Decimal, DecimalConverter::new(options))
            .register_duplex(DatatypeKind::Datetime, DatetimeConverter)
            .register_duplex(DatatypeKind::Date, DateConverter)
            .register_duplex(DatatypeKind::Enum, EnumConverter)
            .register_duplex(DatatypeKind::Collection, CollectionConverter::new(options))
            .register_duplex(DatatypeKind::Object, ObjectConverter)
            .register_duplex(DatatypeKind::Struct, StructConverter::new(options))
            .register_duplex(DatatypeKind::Class, ClassConverter)
            .register_duplex(DatatypeKind::Multi, MultiConverter)
            .register_duplex(DatatypeKind::Union, UnionConverter);
    }
}
