use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::store::DocumentStore;

const JSON: &str = "application/json";

/// How often [`update`] re-reads a document that keeps changing under it.
pub const MAX_UPDATE_ATTEMPTS: usize = 16;

/// Load a JSON document.
pub async fn load<T: DeserializeOwned>(store: &DocumentStore, key: &str) -> Result<T, StorageError> {
    let body = store.get(key).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Load a JSON document, mapping a missing key to `None`.
pub async fn load_optional<T: DeserializeOwned>(
    store: &DocumentStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load(store, key).await {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load every JSON document under a prefix.
///
/// Documents that disappear between the listing and the read are skipped.
pub async fn load_all<T: DeserializeOwned>(
    store: &DocumentStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;

    let mut documents = Vec::with_capacity(keys.len());
    for key in &keys {
        match load_optional(store, key).await? {
            Some(doc) => documents.push(doc),
            None => tracing::debug!(key = %key, "document removed during listing"),
        }
    }

    Ok(documents)
}

/// Save a JSON document, replacing any existing one.
pub async fn save<T: Serialize>(
    store: &DocumentStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put(key, body, Some(JSON)).await
}

/// Save a JSON document only if the key is still free.
///
/// Fails with [`StorageError::PreconditionFailed`] when a document exists.
pub async fn create<T: Serialize>(
    store: &DocumentStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put_if_absent(key, body, Some(JSON)).await
}

/// Read-modify-write a JSON document under optimistic locking.
///
/// `apply` runs against the stored value and the result is written back with
/// an ETag precondition. When another writer got there first, the document is
/// re-read and `apply` runs again, so it must not have side effects outside
/// the value. Returns `None` if the document does not exist, and
/// [`StorageError::Conflict`] after [`MAX_UPDATE_ATTEMPTS`] lost races.
pub async fn update<T, R, E, F>(
    store: &DocumentStore,
    key: &str,
    mut apply: F,
) -> Result<Option<(T, R)>, E>
where
    T: Serialize + DeserializeOwned,
    E: From<StorageError>,
    F: FnMut(&mut T) -> Result<R, E>,
{
    for attempt in 1..=MAX_UPDATE_ATTEMPTS {
        let (body, etag) = match store.get_versioned(key).await {
            Ok(found) => found,
            Err(StorageError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut value: T = serde_json::from_slice(&body).map_err(StorageError::from)?;
        let outcome = apply(&mut value)?;
        let body = serde_json::to_vec(&value).map_err(StorageError::from)?;

        let written = match etag.as_deref() {
            Some(etag) => store.put_if_match(key, body, Some(JSON), etag).await.map(|_| ()),
            None => {
                tracing::warn!(key = %key, "backend returned no ETag; writing unconditionally");
                store.put(key, body, Some(JSON)).await
            }
        };

        match written {
            Ok(()) => return Ok(Some((value, outcome))),
            Err(StorageError::PreconditionFailed { .. }) => {
                tracing::debug!(key = %key, attempt, "document changed concurrently; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StorageError::Conflict {
        key: key.to_string(),
    }
    .into())
}

pub async fn exists(store: &DocumentStore, key: &str) -> Result<bool, StorageError> {
    match store.get(key).await {
        Ok(_) => Ok(true),
        Err(StorageError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
