//! In-memory [`ObjectStore`] implementation.
//!
//! Backs tests and local runs. Concurrent invocations share it safely; the
//! map is keyed by `(store_id, object_key)` so one instance models the whole
//! primary/dead-letter store pair.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ObjectStore, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Concurrent in-memory object store
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<(String, String), StoredObject>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, for test setup
    pub fn seed(&self, store_id: &str, key: &str, bytes: &[u8]) {
        self.objects.insert(
            (store_id.to_string(), key.to_string()),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// All object keys currently present in one store, unordered
    pub fn keys_in(&self, store_id: &str) -> Vec<String> {
        self.objects
            .iter()
            .filter(|entry| entry.key().0 == store_id)
            .map(|entry| entry.key().1.clone())
            .collect()
    }

    /// Number of objects in one store
    pub fn object_count(&self, store_id: &str) -> usize {
        self.keys_in(store_id).len()
    }

    /// Recorded content type of an object, if present
    pub fn content_type(&self, store_id: &str, key: &str) -> Option<String> {
        self.objects
            .get(&(store_id.to_string(), key.to_string()))
            .map(|object| object.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn copy(
        &self,
        src_store: &str,
        src_key: &str,
        dst_store: &str,
        dst_key: &str,
    ) -> Result<(), StoreError> {
        let object = self
            .objects
            .get(&(src_store.to_string(), src_key.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(src_store, src_key))?;

        self.objects
            .insert((dst_store.to_string(), dst_key.to_string()), object);
        Ok(())
    }

    async fn delete(&self, store_id: &str, key: &str) -> Result<(), StoreError> {
        self.objects
            .remove(&(store_id.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::not_found(store_id, key))?;
        Ok(())
    }

    async fn exists(&self, store_id: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .objects
            .contains_key(&(store_id.to_string(), key.to_string())))
    }

    async fn put(
        &self,
        store_id: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.objects.insert(
            (store_id.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, store_id: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .get(&(store_id.to_string(), key.to_string()))
            .map(|entry| entry.value().bytes.clone())
            .ok_or_else(|| StoreError::not_found(store_id, key))
    }
}
