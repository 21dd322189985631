use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("question {0} is not part of this questionnaire")]
    UnknownQuestion(Uuid),

    #[error("an answer is required for \"{text}\"")]
    MissingRequiredAnswer { question_id: Uuid, text: String },

    #[error("No assessment data provided.")]
    NoAssessmentData,
}
