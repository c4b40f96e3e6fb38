//! JSON specific decorations.

use std::fmt;
use std::sync::Arc;

use databind_core::{CollectionKind, Context, Decoration, Location, MapperError, Value};

/// Rename a field's key in the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldName(String);

impl JsonFieldName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Decoration for JsonFieldName {}

/// The field's key must be present in the payload, even if the field has a
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRequired;

impl Decoration for JsonRequired {}

/// JSON-side container for a serialized collection. Overrides
/// [`JsonOptions::collection_as`](crate::JsonOptions::collection_as).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeCollectionAs(pub CollectionKind);

impl Decoration for SerializeCollectionAs {}

/// Conversion hook. Returning `Ok(None)` declines the value and lets the
/// converter fall back to its default handling, where there is one.
pub type JsonHook =
    Arc<dyn Fn(&Context<'_>, &Location<'_>) -> Result<Option<Value>, MapperError> + Send + Sync>;

macro_rules! hook_decoration {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(JsonHook);

        impl $name {
            pub fn new<F>(hook: F) -> Self
            where
                F: Fn(&Context<'_>, &Location<'_>) -> Result<Option<Value>, MapperError>
                    + Send
                    + Sync
                    + 'static,
            {
                Self(Arc::new(hook))
            }

            pub fn call(
                &self,
                ctx: &Context<'_>,
                location: &Location<'_>,
            ) -> Result<Option<Value>, MapperError> {
                (self.0)(ctx, location)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }

        impl Decoration for $name {}
    };
}

hook_decoration! {
    /// Custom serialization for a struct or class. On a struct definition
    /// it runs before field mapping; on a class type it is the class codec.
    JsonSerializer
}

hook_decoration! {
    /// Custom deserialization for a struct or class. On a struct definition
    /// it runs before field mapping; on a class type it is the class codec.
    JsonDeserializer
}
