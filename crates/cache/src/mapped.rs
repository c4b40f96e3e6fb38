use std::sync::Arc;

use databind_core::{Datatype, ObjectMapper, Value};
use databind_json::{JsonError, JsonMapperExt};
use tracing::{debug, trace};

use crate::error::{CacheError, StoreError};
use crate::store::KeyValueStore;

/// Values of one datatype kept in a [`KeyValueStore`] as JSON bytes.
#[derive(Debug)]
pub struct MappedStore<S> {
    store: S,
    mapper: Arc<ObjectMapper>,
    datatype: Datatype,
}

impl<S: KeyValueStore> MappedStore<S> {
    pub fn new(store: S, mapper: Arc<ObjectMapper>, datatype: Datatype) -> Self {
        Self {
            store,
            mapper,
            datatype,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    /// The value stored under `key`, or `None` if the key is missing.
    pub fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let bytes = match self.store.load(key) {
            Ok(bytes) => bytes,
            Err(StoreError::KeyNotFound { .. }) => {
                debug!(key, datatype = %self.datatype, "cache miss");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let mapping = |source: JsonError| CacheError::Mapping {
            key: key.to_owned(),
            source,
        };
        let json: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|err| mapping(err.into()))?;
        let value = self.mapper.from_json_value(json, &self.datatype).map_err(mapping)?;
        trace!(key, bytes = bytes.len(), "cache hit");
        Ok(Some(value))
    }

    /// Serialize `value` and store it under `key`.
    pub fn set(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        let mapping = |source: JsonError| CacheError::Mapping {
            key: key.to_owned(),
            source,
        };
        let json = self.mapper.to_json_value(value, &self.datatype).map_err(mapping)?;
        let bytes = serde_json::to_vec(&json).map_err(|err| mapping(err.into()))?;
        self.store.store(key, bytes)?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.contains(key)?)
    }
}
