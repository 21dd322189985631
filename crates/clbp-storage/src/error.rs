use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),

    #[error("bucket not reachable: {0}")]
    HeadBucket(String),

    #[error("precondition failed for {key}")]
    PreconditionFailed { key: String },

    #[error("gave up on {key} after repeated concurrent updates")]
    Conflict { key: String },

    #[error("invalid store settings: {0}")]
    Config(String),
}
