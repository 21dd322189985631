use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Where documents are kept. Written to the server config file by the
/// installer and read back at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreSettings {
    /// Process-local map. Contents are lost on restart.
    #[default]
    Memory,
    S3 {
        bucket: String,
        region: String,
        #[serde(default, alias = "endpointUrl", skip_serializing_if = "Option::is_none")]
        endpoint_url: Option<String>,
    },
}

impl StoreSettings {
    pub fn validate(&self) -> Result<(), StorageError> {
        match self {
            StoreSettings::Memory => Ok(()),
            StoreSettings::S3 { bucket, region, .. } => {
                if bucket.trim().is_empty() {
                    return Err(StorageError::Config("bucket is required".to_string()));
                }
                if region.trim().is_empty() {
                    return Err(StorageError::Config("region is required".to_string()));
                }
                Ok(())
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreSettings::Memory => "memory",
            StoreSettings::S3 { .. } => "s3",
        }
    }
}
