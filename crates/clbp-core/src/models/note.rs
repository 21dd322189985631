use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A free-text clinical note about a patient, written by a staff user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Note {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
