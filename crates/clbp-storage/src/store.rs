use aws_sdk_s3::Client;

use crate::client;
use crate::error::StorageError;
use crate::memory::MemoryStore;
use crate::objects;
use crate::settings::StoreSettings;

/// Handle to the document store. Cheap to clone; clones share the backend.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    S3 { client: Client, bucket: String },
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Open a store for `settings`. This does not contact the backend; use
    /// [`DocumentStore::ping`] to check connectivity.
    pub async fn open(settings: &StoreSettings) -> Result<Self, StorageError> {
        settings.validate()?;
        match settings {
            StoreSettings::Memory => {
                tracing::warn!("using in-memory document store; data is lost on restart");
                Ok(Self::memory())
            }
            StoreSettings::S3 {
                bucket,
                region,
                endpoint_url,
            } => {
                let client = client::build_client(region, endpoint_url.as_deref()).await;
                tracing::info!(bucket = %bucket, region = %region, "using S3 document store");
                Ok(DocumentStore::S3 {
                    client,
                    bucket: bucket.clone(),
                })
            }
        }
    }

    pub fn memory() -> Self {
        DocumentStore::Memory(MemoryStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            DocumentStore::S3 { .. } => "s3",
            DocumentStore::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<(), StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => objects::head_bucket(client, bucket).await,
            DocumentStore::Memory(_) => Ok(()),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => objects::get_object(client, bucket, key)
                .await
                .map(|output| output.body),
            DocumentStore::Memory(store) => store.get(key).await,
        }
    }

    /// Body and ETag of `key`, for a later [`DocumentStore::put_if_match`].
    pub async fn get_versioned(
        &self,
        key: &str,
    ) -> Result<(Vec<u8>, Option<String>), StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                let output = objects::get_object(client, bucket, key).await?;
                Ok((output.body, output.etag))
            }
            DocumentStore::Memory(store) => {
                let (body, etag) = store.get_versioned(key).await?;
                Ok((body, Some(etag)))
            }
        }
    }

    pub async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                objects::put_object(client, bucket, key, body, content_type).await
            }
            DocumentStore::Memory(store) => {
                store.put(key, body).await;
                Ok(())
            }
        }
    }

    /// Replace `key` only if it still carries `expected_etag`. Fails with
    /// [`StorageError::PreconditionFailed`] when someone wrote in between.
    pub async fn put_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                objects::put_object_if_match(
                    client,
                    bucket,
                    key,
                    body,
                    content_type,
                    expected_etag,
                )
                .await
            }
            DocumentStore::Memory(store) => store.put_if_match(key, body, expected_etag).await,
        }
    }

    /// Create `key` only if it does not exist. Fails with
    /// [`StorageError::PreconditionFailed`] otherwise.
    pub async fn put_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                objects::put_object_if_absent(client, bucket, key, body, content_type).await
            }
            DocumentStore::Memory(store) => store.put_if_absent(key, body).await.map(|_| ()),
        }
    }

    /// Delete a key. Deleting a missing key succeeds on both backends.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                objects::delete_object(client, bucket, key).await
            }
            DocumentStore::Memory(store) => {
                store.delete(key).await;
                Ok(())
            }
        }
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        match self {
            DocumentStore::S3 { client, bucket } => {
                objects::list_objects(client, bucket, prefix).await
            }
            DocumentStore::Memory(store) => Ok(store.list(prefix).await),
        }
    }
}
