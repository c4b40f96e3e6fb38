//! Opaque native objects carried inside a [`Value`](crate::Value).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// An object the mapper only handles through class datatypes.
///
/// Implemented for every `Debug + PartialEq + Send + Sync + 'static` type.
pub trait NativeObject: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn dyn_eq(&self, other: &dyn NativeObject) -> bool;
}

impl<T> NativeObject for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn NativeObject) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// Shared handle to a native object along with its class name.
#[derive(Clone)]
pub struct NativeValue {
    class_name: &'static str,
    type_id: TypeId,
    object: Arc<dyn NativeObject>,
}

impl NativeValue {
    pub fn new<T: NativeObject + PartialEq>(object: T) -> Self {
        Self {
            class_name: short_type_name::<T>(),
            type_id: TypeId::of::<T>(),
            object: Arc::new(object),
        }
    }

    /// Unqualified Rust type name of the wrapped object.
    pub const fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        self.object.dyn_eq(other.object.as_ref())
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.object, f)
    }
}

/// `std::any::type_name` without the module path.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
