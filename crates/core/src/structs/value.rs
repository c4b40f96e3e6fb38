//! Struct instances.

use std::fmt;
use std::sync::Arc;

use crate::error::StructError;
use crate::structs::def::StructDef;
use crate::value::{Object, Value};

/// An instance of a [`StructDef`]: one value per field, in declaration
/// order.
#[derive(Clone)]
pub struct StructValue {
    def: Arc<StructDef>,
    values: Object,
}

impl StructValue {
    pub(crate) fn from_parts(def: Arc<StructDef>, values: Object) -> Self {
        Self { def, values }
    }

    pub fn def(&self) -> &Arc<StructDef> {
        &self.def
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Replace a field value after checking it against the field datatype.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), StructError> {
        let name = self.def.name();
        let spec = self
            .def
            .fields()
            .get(field)
            .ok_or_else(|| StructError::UnknownField {
                name: name.clone(),
                field: field.to_owned(),
            })?;
        let value = value.into();
        let value = if value.is_null() && spec.is_nullable() {
            value
        } else {
            spec.datatype()
                .check_value(value, false, true)
                .map_err(|source| StructError::InvalidArgument {
                    name,
                    field: field.to_owned(),
                    source,
                })?
        };
        self.values.insert(field.to_owned(), value);
        Ok(())
    }

    /// Field values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Object {
        self.values
    }
}

/// Same definition and equal field values.
impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.def, &other.def) && self.values == other.values
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(&self.def.name());
        for (k, v) in &self.values {
            out.field(k, v);
        }
        out.finish()
    }
}

/// `Name(a=1, b="x")`
impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.def.name())?;
        for (i, (k, v)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str(")")
    }
}
