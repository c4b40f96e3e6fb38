//! Structured record types.
//!
//! A [`StructDef`] is declared from a [`FieldSpec`] and produces
//! [`StructValue`] instances. Declarations can use explicit fields,
//! annotations or list definitions; all of them end up in the same
//! [`FieldSpec::new`].
//!
//! ```rust
//! use databind_core::{Annotation, StructDef, TypeDef, Value};
//!
//! let person = StructDef::builder("Person")
//!     .annotated(Annotation::new("name", TypeDef::STR))
//!     .annotated(Annotation::new("age", TypeDef::INT).with_default(0))
//!     .build()
//!     .unwrap();
//!
//! let alice = person.from_kwargs([("name", "Alice")]).unwrap();
//! assert_eq!(alice.get("age"), Some(&Value::from(0)));
//! assert_eq!(alice.to_string(), r#"Person(name="Alice", age=0)"#);
//! ```

mod def;
mod field;
mod spec;
mod value;

pub use def::{INLINE_STRUCT_NAME, StructBuilder, StructDef, create_struct};
pub use field::{DefaultFactory, Field, FieldDefault, REMAINDER_PRIORITY};
pub use spec::{Annotation, FieldSpec, ListItem};
pub use value::StructValue;
