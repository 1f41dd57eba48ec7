use bytes::Bytes;

use super::{ObjectRef, ObjectStore};
use crate::error::StorageError;

/// The process-wide handle to the image container.
///
/// Wraps an [`ObjectStore`] and knows how to turn object keys into public
/// URLs. Calls are passed straight through: no retries, no caching, errors
/// are returned exactly as the store reported them.
pub struct StorageGateway<S: ObjectStore> {
    store: S,
    base_url: String,
}

impl<S: ObjectStore> StorageGateway<S> {
    /// Create a gateway over `store` whose objects are publicly served under
    /// `base_url` (e.g. `https://account.example.com`).
    pub fn new(store: S, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    /// Write an object, overwriting whatever is at `key`.
    pub async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.store.put(key, body, content_type).await
    }

    /// List all objects in the container.
    pub async fn list(&self) -> Result<Vec<ObjectRef>, StorageError> {
        self.store.list().await
    }

    /// Public URL for `key`: `{base_url}/{container}/{key}`.
    ///
    /// The object is not checked for existence.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.store.container(), key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn container(&self) -> &str {
        self.store.container()
    }
}
