use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::question::Question;
use crate::error::CoreError;

/// A stored questionnaire. Questions are referenced by id, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Questionnaire {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Uuid>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// A questionnaire with its question documents resolved in order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuestionnaireDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<Uuid>>,
}

impl Questionnaire {
    /// Create an empty questionnaire. Questions are added one at a time
    /// through the questionnaire's question endpoints.
    pub fn new(draft: QuestionnaireDraft, now: jiff::Timestamp) -> Result<Self, CoreError> {
        let title = draft
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::MissingField("title".to_string()))?;

        Ok(Questionnaire {
            id: Uuid::new_v4(),
            title,
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. A blank title keeps the current one.
    ///
    /// A present question list may only reorder the current questions:
    /// questions are added and removed through the question endpoints, which
    /// own the question documents. Nothing changes when the update is
    /// rejected.
    pub fn apply(
        &mut self,
        draft: QuestionnaireDraft,
        now: jiff::Timestamp,
    ) -> Result<(), CoreError> {
        let order = draft.questions.map(|ids| self.reordered(ids)).transpose()?;

        if let Some(title) = draft.title.map(|t| t.trim().to_string())
            && !title.is_empty()
        {
            self.title = title;
        }
        if let Some(description) = draft.description {
            self.description = description.trim().to_string();
        }
        if let Some(order) = order {
            self.questions = order;
        }
        self.updated_at = now;
        Ok(())
    }

    fn reordered(&self, ids: Vec<Uuid>) -> Result<Vec<Uuid>, CoreError> {
        let mut seen = HashSet::new();
        let order: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

        if let Some(foreign) = order.iter().find(|id| !self.questions.contains(id)) {
            return Err(CoreError::validation(format!(
                "question {foreign} does not belong to this questionnaire"
            )));
        }
        if let Some(missing) = self.questions.iter().find(|id| !seen.contains(id)) {
            return Err(CoreError::validation(format!(
                "question {missing} is missing from the new order; remove questions through the question endpoint"
            )));
        }
        Ok(order)
    }

    pub fn populate(self, questions: Vec<Question>) -> QuestionnaireDetail {
        QuestionnaireDetail {
            id: self.id,
            title: self.title,
            description: self.description,
            questions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
