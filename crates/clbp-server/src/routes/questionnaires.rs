use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use clbp_core::keys;
use clbp_core::models::question::{Question, QuestionDraft};
use clbp_core::models::questionnaire::{Questionnaire, QuestionnaireDetail, QuestionnaireDraft};
use clbp_storage::documents;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::{MessageResponse, load_or_404, update_or_404};
use crate::state::AppState;

/// Resolve a questionnaire's question ids in order. References to questions
/// that no longer exist are skipped.
pub(crate) async fn load_questions(
    state: &AppState,
    questionnaire: &Questionnaire,
) -> Result<Vec<Question>, ApiError> {
    let mut questions = Vec::with_capacity(questionnaire.questions.len());
    for id in &questionnaire.questions {
        match documents::load_optional::<Question>(&state.store, &keys::question(*id)).await? {
            Some(question) => questions.push(question),
            None => tracing::warn!(
                questionnaire_id = %questionnaire.id,
                question_id = %id,
                "questionnaire references a missing question"
            ),
        }
    }
    Ok(questions)
}

async fn populated(
    state: &AppState,
    questionnaire: Questionnaire,
) -> Result<QuestionnaireDetail, ApiError> {
    let questions = load_questions(state, &questionnaire).await?;
    Ok(questionnaire.populate(questions))
}

pub async fn list_questionnaires(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionnaireDetail>>, ApiError> {
    let mut questionnaires: Vec<Questionnaire> =
        documents::load_all(&state.store, keys::QUESTIONNAIRES_PREFIX).await?;
    questionnaires.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut details = Vec::with_capacity(questionnaires.len());
    for questionnaire in questionnaires {
        details.push(populated(&state, questionnaire).await?);
    }
    Ok(Json(details))
}

pub async fn create_questionnaire(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<QuestionnaireDraft>,
) -> Result<(StatusCode, Json<QuestionnaireDetail>), ApiError> {
    let questionnaire = Questionnaire::new(draft, jiff::Timestamp::now())?;
    documents::save(
        &state.store,
        &keys::questionnaire(questionnaire.id),
        &questionnaire,
    )
    .await?;

    tracing::info!(resource = "questionnaire", id = %questionnaire.id, "questionnaire created");
    Ok((StatusCode::CREATED, Json(questionnaire.populate(Vec::new()))))
}

pub async fn get_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionnaireDetail>, ApiError> {
    let questionnaire: Questionnaire =
        load_or_404(&state, &keys::questionnaire(id), "Questionnaire").await?;
    Ok(Json(populated(&state, questionnaire).await?))
}

/// Update title, description, or question order. The question list can only
/// be reordered; questions come and go through the question endpoints.
pub async fn update_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(draft): ApiJson<QuestionnaireDraft>,
) -> Result<Json<QuestionnaireDetail>, ApiError> {
    let now = jiff::Timestamp::now();
    let (questionnaire, ()) = update_or_404(
        &state,
        &keys::questionnaire(id),
        "Questionnaire",
        |questionnaire: &mut Questionnaire| Ok(questionnaire.apply(draft.clone(), now)?),
    )
    .await?;

    tracing::info!(resource = "questionnaire", id = %id, "questionnaire updated");
    Ok(Json(populated(&state, questionnaire).await?))
}

/// Delete a questionnaire and every question it references.
pub async fn delete_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = keys::questionnaire(id);
    let questionnaire: Questionnaire = load_or_404(&state, &key, "Questionnaire").await?;

    for question_id in &questionnaire.questions {
        state.store.delete(&keys::question(*question_id)).await?;
    }
    state.store.delete(&key).await?;

    tracing::info!(
        resource = "questionnaire",
        id = %id,
        questions = questionnaire.questions.len(),
        "questionnaire deleted"
    );
    Ok(Json(MessageResponse::new("Questionnaire removed")))
}

pub async fn add_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(draft): ApiJson<QuestionDraft>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let key = keys::questionnaire(id);
    if !documents::exists(&state.store, &key).await? {
        return Err(ApiError::not_found("Questionnaire"));
    }

    let now = jiff::Timestamp::now();
    let question = Question::from_draft(draft, now)?;
    let question_key = keys::question(question.id);
    documents::save(&state.store, &question_key, &question).await?;

    let linked = documents::update(&state.store, &key, |questionnaire: &mut Questionnaire| {
        questionnaire.questions.push(question.id);
        questionnaire.updated_at = now;
        Ok::<_, ApiError>(())
    })
    .await;

    let failure = match linked {
        Ok(Some(_)) => None,
        Ok(None) => Some(ApiError::not_found("Questionnaire")),
        Err(e) => Some(e),
    };
    if let Some(err) = failure {
        // Nothing references the new question; drop it.
        state.store.delete(&question_key).await?;
        return Err(err);
    }

    tracing::info!(
        resource = "question",
        id = %question.id,
        questionnaire_id = %id,
        "question added"
    );
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    ApiJson(draft): ApiJson<QuestionDraft>,
) -> Result<Json<Question>, ApiError> {
    let questionnaire: Questionnaire =
        load_or_404(&state, &keys::questionnaire(id), "Questionnaire").await?;
    if !questionnaire.questions.contains(&question_id) {
        return Err(ApiError::not_found("Question"));
    }

    let now = jiff::Timestamp::now();
    let (question, ()) = update_or_404(
        &state,
        &keys::question(question_id),
        "Question",
        |question: &mut Question| Ok(question.apply(draft.clone(), now)?),
    )
    .await?;

    tracing::info!(resource = "question", id = %question_id, "question updated");
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let question_key = keys::question(question_id);
    if !documents::exists(&state.store, &question_key).await? {
        return Err(ApiError::not_found("Questionnaire or Question"));
    }

    let now = jiff::Timestamp::now();
    update_or_404(
        &state,
        &keys::questionnaire(id),
        "Questionnaire or Question",
        |questionnaire: &mut Questionnaire| {
            if !questionnaire.questions.contains(&question_id) {
                return Err(ApiError::not_found("Questionnaire or Question"));
            }
            questionnaire.questions.retain(|q| *q != question_id);
            questionnaire.updated_at = now;
            Ok(())
        },
    )
    .await?;
    state.store.delete(&question_key).await?;

    tracing::info!(resource = "question", id = %question_id, questionnaire_id = %id, "question removed");
    Ok(Json(MessageResponse::new("Question removed")))
}
