use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::datatype::Datatype;
use crate::error::{CheckError, TypeDefError};
use crate::value::Value;

#[derive(Debug)]
struct Slot {
    name: String,
    target: OnceLock<Datatype>,
}

/// Forward declaration of a datatype.
///
/// Declare the proxy, use it wherever the datatype is referenced (including
/// inside the datatype itself), then [`close`](Self::close) it once the
/// datatype is built. Clones share the same slot. A closed proxy delegates
/// every operation to its target; using an open one is an error.
///
/// A recursive struct closed over its own proxy holds a reference cycle and
/// is never freed. Declare recursive types once, for the lifetime of the
/// program.
#[derive(Clone)]
pub struct ProxyType {
    slot: Arc<Slot>,
}

impl ProxyType {
    pub fn declare(name: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Slot {
                name: name.into(),
                target: OnceLock::new(),
            }),
        }
    }

    /// Set the target datatype. A proxy can be closed only once.
    pub fn close(&self, datatype: impl Into<Datatype>) -> Result<(), TypeDefError> {
        self.slot
            .target
            .set(datatype.into())
            .map_err(|_| TypeDefError::ProxyAlreadyClosed {
                name: self.slot.name.clone(),
            })
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    pub fn get(&self) -> Option<&Datatype> {
        self.slot.target.get()
    }

    pub fn is_closed(&self) -> bool {
        self.slot.target.get().is_some()
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match self.get() {
            Some(target) => target.check_value(value, strict, coerce),
            None => Err(CheckError::UnresolvedProxy {
                name: self.slot.name.clone(),
            }),
        }
    }
}

impl PartialEq for ProxyType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyType")
            .field("name", &self.slot.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::StringType;

    #[test]
    fn open_proxy_rejects_values() {
        let proxy = ProxyType::declare("Name");
        let err = proxy.check(Value::from("x"), false, true).unwrap_err();
        assert_eq!(err.to_string(), "forward declaration Name is not closed");
    }

    #[test]
    fn closes_once_and_delegates() {
        let proxy = ProxyType::declare("Name");
        let alias = proxy.clone();
        proxy.close(StringType::default()).unwrap();
        assert!(alias.is_closed());
        assert!(alias.check(Value::from("x"), false, true).is_ok());
        assert!(alias.check(Value::from(1), false, true).is_err());
        assert!(matches!(
            proxy.close(StringType::default()),
            Err(TypeDefError::ProxyAlreadyClosed { .. })
        ));
    }
}
