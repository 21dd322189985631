use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum AssessmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStatus::Pending => "pending",
            AssessmentStatus::InProgress => "in-progress",
            AssessmentStatus::Completed => "completed",
        }
    }
}

/// One answered question within an assessment, with the score it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Response {
    pub question_id: Uuid,
    pub answer: serde_json::Value,
    #[serde(default)]
    pub score: f64,
}

/// A patient's run through a questionnaire.
///
/// `risk_score` is always the sum of the response scores; it is recomputed
/// whenever responses change.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub questionnaire_id: Uuid,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Assessment {
    /// Move to `status`, stamping `completed_at` on the first transition to
    /// completed and clearing it when an assessment is reopened.
    pub fn set_status(&mut self, status: AssessmentStatus, now: jiff::Timestamp) {
        match status {
            AssessmentStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
            }
            _ => self.completed_at = None,
        }
        self.status = status;
    }
}
