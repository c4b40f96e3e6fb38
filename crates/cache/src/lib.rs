//! # databind-cache
//!
//! Typed values over byte-oriented key-value stores.
//!
//! A [`KeyValueStore`] moves raw bytes. [`MappedStore`] puts a datatype on
//! top of one: values are serialized with an [`ObjectMapper`], stored as
//! JSON bytes and deserialized again on the way out.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use databind_cache::{MappedStore, MemoryStore};
//! use databind_core::{CollectionType, IntegerType, ObjectMapper, Value};
//! use databind_json::JsonModule;
//!
//! let mapper = Arc::new(ObjectMapper::new(JsonModule::default()));
//! let scores = MappedStore::new(
//!     MemoryStore::new(),
//!     mapper,
//!     CollectionType::list(IntegerType::default()).into(),
//! );
//!
//! scores.set("alice", &Value::array([3, 5])).unwrap();
//! assert_eq!(scores.get("alice").unwrap(), Some(Value::array([3, 5])));
//! assert_eq!(scores.get("bob").unwrap(), None);
//! ```

#![forbid(unsafe_code)]

mod error;
mod mapped;
mod memory;
mod store;

pub use error::{CacheError, StoreError};
pub use mapped::MappedStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

#[doc(no_inline)]
pub use databind_core::ObjectMapper;

/// Result type for typed store operations.
pub type Result<T, E = CacheError> = std::result::Result<T, E>;
