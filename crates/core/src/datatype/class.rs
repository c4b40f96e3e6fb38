use std::any::{Any, TypeId};

use crate::datatype::mismatch;
use crate::decoration::{Decoration, Decorations};
use crate::error::CheckError;
use crate::value::Value;
use crate::value::native::short_type_name;

/// Opaque native objects of one Rust type.
///
/// The mapper knows nothing about the wrapped type; converters find their
/// codecs in the class decorations.
#[derive(Debug, Clone)]
pub struct ClassType {
    name: String,
    type_id: TypeId,
    decorations: Decorations,
}

impl ClassType {
    /// Class type for `T`, named after the Rust type.
    pub fn of<T: Any>() -> Self {
        Self {
            name: short_type_name::<T>().to_owned(),
            type_id: TypeId::of::<T>(),
            decorations: Decorations::new(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn decorate(mut self, decoration: impl Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub const fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::Native(n) if n.type_id() == self.type_id)
    }

    pub(crate) fn check(&self, value: Value) -> Result<Value, CheckError> {
        if self.is_instance(&value) {
            Ok(value)
        } else {
            Err(mismatch(&self.name, &value))
        }
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}
