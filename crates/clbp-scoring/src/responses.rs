use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use clbp_core::models::assessment::Response;
use clbp_core::models::question::Question;

use crate::answer::{is_blank, score_answer};
use crate::error::ScoringError;

/// Whether required questions must be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Saving progress: required questions may still be open.
    Partial,
    /// Submitting: every required question needs a non-blank answer.
    Complete,
}

/// Score submitted answers against a questionnaire's questions.
///
/// Responses come back in questionnaire order; questions without an answer
/// produce no response.
pub fn score_responses(
    questions: &[Question],
    answers: &HashMap<Uuid, Value>,
    completeness: Completeness,
) -> Result<Vec<Response>, ScoringError> {
    if let Some(unknown) = answers
        .keys()
        .find(|id| !questions.iter().any(|q| q.id == **id))
    {
        return Err(ScoringError::UnknownQuestion(*unknown));
    }

    let mut responses = Vec::with_capacity(answers.len());
    for question in questions {
        match answers.get(&question.id) {
            Some(answer) => {
                if completeness == Completeness::Complete
                    && question.is_required
                    && is_blank(answer)
                {
                    return Err(missing(question));
                }
                responses.push(Response {
                    question_id: question.id,
                    answer: answer.clone(),
                    score: score_answer(question, answer),
                });
            }
            None if completeness == Completeness::Complete && question.is_required => {
                return Err(missing(question));
            }
            None => {}
        }
    }

    Ok(responses)
}

/// Recompute stored response scores against the current questions.
/// Responses whose question no longer exists score 0.
pub fn rescore(questions: &[Question], responses: &mut [Response]) {
    for response in responses.iter_mut() {
        response.score = questions
            .iter()
            .find(|q| q.id == response.question_id)
            .map(|q| score_answer(q, &response.answer))
            .unwrap_or(0.0);
    }
}

/// The aggregate risk score of an assessment.
pub fn total_score(responses: &[Response]) -> f64 {
    responses.iter().map(|r| r.score).sum()
}

fn missing(question: &Question) -> ScoringError {
    ScoringError::MissingRequiredAnswer {
        question_id: question.id,
        text: question.text.clone(),
    }
}
