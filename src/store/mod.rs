//! # Object Store Interface
//!
//! Narrow seam over the primary/dead-letter artifact store pair. The
//! orchestration core only ever needs five operations; everything else about
//! the backing store is someone else's concern.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryObjectStore;

/// Object store operation failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object {store_id}/{key} not found")]
    NotFound { store_id: String, key: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(store_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            store_id: store_id.into(),
            key: key.into(),
        }
    }

    /// Whether a bounded local retry may succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}

/// Seam for the artifact object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Copy an object between stores; the source is left untouched
    async fn copy(
        &self,
        src_store: &str,
        src_key: &str,
        dst_store: &str,
        dst_key: &str,
    ) -> Result<(), StoreError>;

    /// Delete an object
    async fn delete(&self, store_id: &str, key: &str) -> Result<(), StoreError>;

    /// Check whether an object exists
    async fn exists(&self, store_id: &str, key: &str) -> Result<bool, StoreError>;

    /// Write an object from bytes
    async fn put(
        &self,
        store_id: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Read an object's bytes
    async fn get(&self, store_id: &str, key: &str) -> Result<Vec<u8>, StoreError>;
}
