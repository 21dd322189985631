use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::trimmed;
use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<jiff::civil::Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<jiff::civil::Date>,
    pub gender: Option<String>,
}

impl Patient {
    pub fn from_draft(draft: PatientDraft, now: jiff::Timestamp) -> Result<Self, CoreError> {
        let first_name =
            trimmed(draft.first_name).ok_or_else(|| CoreError::MissingField("firstName".into()))?;
        let last_name =
            trimmed(draft.last_name).ok_or_else(|| CoreError::MissingField("lastName".into()))?;

        Ok(Patient {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email: trimmed(draft.email),
            phone: trimmed(draft.phone),
            date_of_birth: draft.date_of_birth,
            gender: trimmed(draft.gender),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply the fields present in `draft`. Names cannot be blanked; the
    /// optional contact fields are cleared by sending an empty string.
    pub fn apply(&mut self, draft: PatientDraft, now: jiff::Timestamp) {
        if let Some(first_name) = trimmed(draft.first_name) {
            self.first_name = first_name;
        }
        if let Some(last_name) = trimmed(draft.last_name) {
            self.last_name = last_name;
        }
        if draft.email.is_some() {
            self.email = trimmed(draft.email);
        }
        if draft.phone.is_some() {
            self.phone = trimmed(draft.phone);
        }
        if draft.date_of_birth.is_some() {
            self.date_of_birth = draft.date_of_birth;
        }
        if draft.gender.is_some() {
            self.gender = trimmed(draft.gender);
        }
        self.updated_at = now;
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
