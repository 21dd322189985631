use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StorageError;

#[derive(Debug)]
struct Entry {
    body: Vec<u8>,
    version: u64,
}

#[derive(Debug, Default)]
struct Objects {
    entries: BTreeMap<String, Entry>,
    next_version: u64,
}

impl Objects {
    fn insert(&mut self, key: &str, body: Vec<u8>) -> String {
        self.next_version += 1;
        let version = self.next_version;
        self.entries.insert(key.to_string(), Entry { body, version });
        etag(version)
    }
}

// Quoted like the ETags S3 returns.
fn etag(version: u64) -> String {
    format!("\"{version}\"")
}

/// Process-local object map with the same key semantics as the S3 backend.
///
/// Every write assigns a fresh ETag so conditional writes behave like S3's
/// `If-Match` / `If-None-Match`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<Objects>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.get_versioned(key).await.map(|(body, _)| body)
    }

    /// Body and current ETag of `key`.
    pub async fn get_versioned(&self, key: &str) -> Result<(Vec<u8>, String), StorageError> {
        self.objects
            .read()
            .await
            .entries
            .get(key)
            .map(|entry| (entry.body.clone(), etag(entry.version)))
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    pub async fn put(&self, key: &str, body: Vec<u8>) -> String {
        self.objects.write().await.insert(key, body)
    }

    /// Replace `key` only while its ETag is still `expected_etag`.
    pub async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let mut objects = self.objects.write().await;
        let current = objects.entries.get(key).map(|entry| etag(entry.version));
        if current.as_deref() != Some(expected_etag) {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        Ok(objects.insert(key, body))
    }

    /// Create `key` only if nothing is stored under it yet.
    pub async fn put_if_absent(&self, key: &str, body: Vec<u8>) -> Result<String, StorageError> {
        let mut objects = self.objects.write().await;
        if objects.entries.contains_key(key) {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        Ok(objects.insert(key, body))
    }

    pub async fn delete(&self, key: &str) {
        self.objects.write().await.entries.remove(key);
    }

    /// Keys under `prefix`, in lexicographic order like S3 listings.
    pub async fn list(&self, prefix: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }
}
