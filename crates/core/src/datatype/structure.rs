use std::sync::Arc;

use crate::datatype::mismatch;
use crate::error::CheckError;
use crate::structs::StructDef;
use crate::value::Value;

/// Instances of a [`StructDef`] (or of a definition inheriting from it).
///
/// `ignore_keys` lists payload keys the struct converter must treat as
/// reserved: they are neither read into fields nor reported as extra keys
/// in strict mode. Union types use it for their discriminator key.
#[derive(Debug, Clone)]
pub struct StructType {
    def: Arc<StructDef>,
    ignore_keys: Vec<String>,
}

impl StructType {
    pub fn new(def: Arc<StructDef>) -> Self {
        Self {
            def,
            ignore_keys: Vec::new(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_ignore_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn def(&self) -> &Arc<StructDef> {
        &self.def
    }

    pub fn ignore_keys(&self) -> &[String] {
        &self.ignore_keys
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_keys.iter().any(|k| k == key)
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        if let Value::Struct(s) = &value {
            if s.def().inherits_from(&self.def) {
                return Ok(value);
            }
        }
        match value {
            Value::Object(map) if coerce && !strict => self
                .def
                .from_kwargs(map)
                .map(Value::Struct)
                .map_err(|e| CheckError::invalid(e.to_string())),
            other => Err(mismatch(self.def.name(), &other)),
        }
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.def, &other.def) && self.ignore_keys == other.ignore_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{Datatype, IntegerType};
    use crate::structs::Field;
    use pretty_assertions::assert_eq;

    fn point() -> Arc<StructDef> {
        StructDef::builder("Point")
            .field("x", Field::new(IntegerType::default()))
            .field("y", Field::new(IntegerType::default()).default_value(0))
            .build()
            .unwrap()
    }

    #[test]
    fn accepts_instances_and_subclasses() {
        let base = point();
        let derived = StructDef::builder("Point3")
            .inherit(&base)
            .field("z", Field::new(IntegerType::default()).default_value(0))
            .build()
            .unwrap();
        let t = StructType::new(Arc::clone(&base));
        let instance = derived.from_kwargs([("x", 1)]).unwrap();
        assert!(t.check(Value::Struct(instance), true, false).is_ok());

        let other = StructType::new(derived);
        let instance = base.from_kwargs([("x", 1)]).unwrap();
        assert!(other.check(Value::Struct(instance), true, false).is_err());
    }

    #[test]
    fn lenient_check_builds_from_objects() {
        let t = Datatype::Struct(StructType::new(point()));
        let value = t
            .check_value(Value::object([("x", 3)]), false, true)
            .unwrap();
        assert_eq!(value.get("y"), Some(&Value::from(0)));
        assert!(t.check_value(Value::object([("x", 3)]), true, true).is_err());
    }
}
