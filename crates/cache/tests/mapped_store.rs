use std::sync::Arc;

use databind_cache::{CacheError, KeyValueStore, MappedStore, MemoryStore, StoreError};
use databind_core::{Annotation, ObjectMapper, StructDef, TypeDef, Value};
use databind_json::JsonModule;
use pretty_assertions::assert_eq;

fn mapper() -> Arc<ObjectMapper> {
    Arc::new(ObjectMapper::new(JsonModule::default()))
}

fn session() -> Arc<StructDef> {
    StructDef::builder("Session")
        .annotated(Annotation::new("user", TypeDef::STR))
        .annotated(Annotation::new("hits", TypeDef::INT).with_default(0))
        .build()
        .unwrap()
}

#[test]
fn structs_are_stored_as_json() {
    let def = session();
    let store = Arc::new(MemoryStore::new());
    let sessions = MappedStore::new(Arc::clone(&store), mapper(), def.datatype());

    let instance = def
        .from_kwargs([("user", Value::from("ann")), ("hits", Value::from(3))])
        .unwrap();
    let value = Value::Struct(instance);
    sessions.set("s1", &value).unwrap();

    assert_eq!(store.load("s1").unwrap(), br#"{"user":"ann","hits":3}"#.to_vec());
    assert_eq!(sessions.get("s1").unwrap(), Some(value));
    assert!(sessions.contains("s1").unwrap());
    assert!(!sessions.contains("s2").unwrap());
}

#[test]
fn missing_keys_are_none() {
    let sessions = MappedStore::new(MemoryStore::new(), mapper(), session().datatype());
    assert_eq!(sessions.get("nobody").unwrap(), None);
}

#[test]
fn undecodable_bytes_are_mapping_errors() {
    let store = Arc::new(MemoryStore::new());
    store.store("s1", b"not json".to_vec()).unwrap();
    store.store("s2", br#"{"hits": 1}"#.to_vec()).unwrap();
    let sessions = MappedStore::new(Arc::clone(&store), mapper(), session().datatype());

    let err = sessions.get("s1").unwrap_err();
    assert_eq!(err.code(), "syntax");

    let err = sessions.get("s2").unwrap_err();
    assert_eq!(err.code(), "value_mismatch");
    assert_eq!(
        err.to_string(),
        r#"cannot map value for key "s2": at $: missing member "user" for Session object"#
    );
}

#[derive(Debug)]
struct Offline;

impl KeyValueStore for Offline {
    fn load(&self, _: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    fn store(&self, _: &str, _: Vec<u8>) -> Result<(), StoreError> {
        Err(StoreError::backend("connection refused"))
    }
}

#[test]
fn backend_failures_propagate() {
    let sessions = MappedStore::new(Offline, mapper(), session().datatype());
    let err = sessions.get("s1").unwrap_err();
    assert!(matches!(err, CacheError::Store(StoreError::Backend { .. })));
    assert_eq!(err.code(), "store");
    assert!(sessions.contains("s1").is_err());
}
