use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

use crate::error::CoreError;

/// A single key/value application setting. Keys are unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// Trim a setting key and check it is usable as a document key segment.
pub fn normalize_key(key: &str) -> Result<String, CoreError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CoreError::MissingField("key".to_string()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        || key.starts_with('.')
    {
        return Err(CoreError::validation(format!("invalid setting key: {key}")));
    }
    Ok(key.to_string())
}

/// Settings written at startup when absent.
pub fn defaults() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        ("appName", json!("CLBP Predictive System")),
        (
            "emergencyContact",
            json!({ "name": "Default Emergency Contact", "phone": "123-456-7890" }),
        ),
    ]
}
