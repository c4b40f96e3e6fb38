use std::sync::Arc;

use crate::error::StoreError;

/// Byte-oriented key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Load the bytes stored under `key`. Missing keys are
    /// [`StoreError::KeyNotFound`].
    fn load(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        match self.load(key) {
            Ok(_) => Ok(true),
            Err(StoreError::KeyNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn load(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).store(key, value)
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        (**self).contains(key)
    }
}
