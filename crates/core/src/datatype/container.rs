//! Collection and object datatypes.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::datatype::{Datatype, mismatch};
use crate::error::CheckError;
use crate::value::{Object, Value};

/// In-process container of a [`CollectionType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Ordered, duplicates allowed.
    #[default]
    List,
    /// Unordered, duplicates dropped.
    Set,
}

impl CollectionKind {
    /// Wrap `items` in this container.
    pub fn build(self, items: Vec<Value>) -> Value {
        match self {
            Self::List => Value::Array(items),
            Self::Set => Value::set(items),
        }
    }
}

/// Homogeneous collections.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionType {
    item_type: Box<Datatype>,
    container: CollectionKind,
}

impl CollectionType {
    pub fn new(item_type: impl Into<Datatype>, container: CollectionKind) -> Self {
        Self {
            item_type: Box::new(item_type.into()),
            container,
        }
    }

    pub fn list(item_type: impl Into<Datatype>) -> Self {
        Self::new(item_type, CollectionKind::List)
    }

    pub fn set(item_type: impl Into<Datatype>) -> Self {
        Self::new(item_type, CollectionKind::Set)
    }

    pub fn item_type(&self) -> &Datatype {
        &self.item_type
    }

    pub const fn container(&self) -> CollectionKind {
        self.container
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        let (items, was_set) = match value {
            Value::Array(items) => (items, false),
            Value::Set(items) => (items, true),
            other => return Err(mismatch(self, &other)),
        };
        let items = items
            .into_iter()
            .map(|item| self.item_type.check_value(item, strict, coerce))
            .collect::<Result<Vec<_>, _>>()?;
        if coerce {
            Ok(self.container.build(items))
        } else if was_set {
            Ok(Value::Set(items))
        } else {
            Ok(Value::Array(items))
        }
    }
}

impl Display for CollectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.container {
            CollectionKind::List => write!(f, "Collection<{}>", self.item_type),
            CollectionKind::Set => write!(f, "Set<{}>", self.item_type),
        }
    }
}

/// String keyed maps with homogeneous values.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    value_type: Box<Datatype>,
}

impl ObjectType {
    pub fn new(value_type: impl Into<Datatype>) -> Self {
        Self {
            value_type: Box::new(value_type.into()),
        }
    }

    /// Map of arbitrary values.
    pub fn any() -> Self {
        Self::new(Datatype::Any)
    }

    pub fn value_type(&self) -> &Datatype {
        &self.value_type
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(mismatch(format!("Object<{}>", self.value_type), &other)),
        };
        let map = map
            .into_iter()
            .map(|(k, v)| Ok((k, self.value_type.check_value(v, strict, coerce)?)))
            .collect::<Result<Object, CheckError>>()?;
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{IntegerType, StringType};
    use pretty_assertions::assert_eq;

    #[test]
    fn set_backed_collections_coerce_lists() {
        let t = CollectionType::set(StringType::default());
        let checked = t.check(Value::array(["a", "b", "a"]), false, true).unwrap();
        assert_eq!(checked, Value::set(["a", "b"]));
    }

    #[test]
    fn items_are_checked() {
        let t = CollectionType::list(IntegerType::default());
        let err = t.check(Value::array([Value::from(1), Value::from("x")]), false, true);
        assert!(err.is_err());
        assert!(t.check(Value::from("abc"), false, true).unwrap_err().is_mismatch());
    }

    #[test]
    fn object_values_are_checked_in_order() {
        let t = ObjectType::new(IntegerType::new(false));
        let checked = t
            .check(Value::object([("b", "1"), ("a", "2")]), false, true)
            .unwrap();
        assert_eq!(checked, Value::object([("b", 1), ("a", 2)]));
    }
}
