//! In-memory store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Thread-safe in-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `key`, returning its bytes if it was present.
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stored keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::key_not_found(key))
    }

    fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_owned(), value);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.read().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn load_store_and_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.store("a", b"1".to_vec()).unwrap();
        assert_eq!(store.load("a").unwrap(), b"1");
        assert!(store.contains("a").unwrap());

        store.store("a", b"2".to_vec()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove("a"), Some(b"2".to_vec()));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_keys_are_reported_as_such() {
        let err = MemoryStore::new().load("nope").unwrap_err();
        assert!(err.is_key_not_found());
        assert_eq!(err.to_string(), "key not found: nope");
    }

    #[test]
    fn concurrent_writers_do_not_lose_entries() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.store(&format!("k{i}"), vec![i]).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, (0..8).map(|i| format!("k{i}")).collect::<Vec<_>>());
    }
}
