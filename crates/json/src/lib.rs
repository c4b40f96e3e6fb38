//! # databind-json
//!
//! JSON converters for the databind [`ObjectMapper`].
//!
//! [`JsonModule`] registers one converter per datatype kind. Payloads are
//! JSON-shaped [`Value`]s; [`JsonMapperExt`] adds `serde_json` entry points
//! on top of the mapper.
//!
//! ```rust
//! use databind_core::{Annotation, ObjectMapper, StructDef, TypeDef, Value};
//! use databind_json::{JsonMapperExt, JsonModule};
//!
//! let person = StructDef::builder("Person")
//!     .annotated(Annotation::new("name", TypeDef::STR))
//!     .annotated(Annotation::new("age", TypeDef::INT).with_default(0))
//!     .build()
//!     .unwrap();
//!
//! let mapper = ObjectMapper::new(JsonModule::default());
//! let alice = mapper.from_json_str(r#"{"name": "Alice"}"#, &person.datatype()).unwrap();
//! assert_eq!(alice.get("age"), Some(&Value::from(0)));
//! assert_eq!(
//!     mapper.to_json_string(&alice, &person.datatype()).unwrap(),
//!     r#"{"name":"Alice","age":0}"#
//! );
//! ```

#![forbid(unsafe_code)]

mod class;
mod converters;
mod decoration;
mod error;
mod ext;
mod module;
mod options;

pub use class::{JsonClass, json_class};
pub use decoration::{
    JsonDeserializer, JsonFieldName, JsonHook, JsonRequired, JsonSerializer,
    SerializeCollectionAs,
};
pub use error::JsonError;
pub use ext::JsonMapperExt;
pub use module::JsonModule;
pub use options::JsonOptions;

#[doc(no_inline)]
pub use databind_core::{ObjectMapper, Value};

/// Result type for JSON entry points.
pub type Result<T, E = JsonError> = std::result::Result<T, E>;
