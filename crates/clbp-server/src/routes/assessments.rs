use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use clbp_core::keys;
use clbp_core::models::assessment::{Assessment, AssessmentStatus};
use clbp_core::models::patient::Patient;
use clbp_core::models::question::Question;
use clbp_core::models::questionnaire::Questionnaire;
use clbp_export::csv::{ExportLookup, assessments_csv};
use clbp_scoring::{Completeness, rescore, score_responses, total_score};
use clbp_storage::documents;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::questionnaires::load_questions;
use crate::routes::{MessageResponse, load_or_404, update_or_404};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub patient_id: Option<Uuid>,
    pub questionnaire_id: Option<Uuid>,
    pub responses: Option<HashMap<Uuid, Value>>,
    pub status: Option<AssessmentStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssessmentRequest {
    pub responses: Option<HashMap<Uuid, Value>>,
    pub status: Option<AssessmentStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub questionnaire_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

/// An assessment listed for a patient, with its questionnaire's title.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAssessment {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub questionnaire_title: Option<String>,
}

pub(crate) async fn all_assessments(state: &AppState) -> Result<Vec<Assessment>, ApiError> {
    Ok(documents::load_all(&state.store, keys::ASSESSMENTS_PREFIX).await?)
}

fn completeness(status: AssessmentStatus) -> Completeness {
    match status {
        AssessmentStatus::Completed => Completeness::Complete,
        _ => Completeness::Partial,
    }
}

fn newest_first(assessments: &mut [Assessment]) {
    assessments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub async fn list_assessments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    let mut assessments = all_assessments(&state).await?;
    newest_first(&mut assessments);
    Ok(Json(assessments))
}

/// Score and store a submitted assessment. Submissions are completed unless
/// the client asks for another status.
pub async fn create_assessment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<Assessment>), ApiError> {
    let (Some(patient_id), Some(questionnaire_id), Some(answers)) =
        (req.patient_id, req.questionnaire_id, req.responses)
    else {
        return Err(ApiError::BadRequest(
            "Patient ID, Questionnaire ID, and responses are required".to_string(),
        ));
    };

    if !documents::exists(&state.store, &keys::patient(patient_id)).await? {
        return Err(ApiError::not_found("Patient"));
    }
    let questionnaire: Questionnaire =
        load_or_404(&state, &keys::questionnaire(questionnaire_id), "Questionnaire").await?;
    let questions = load_questions(&state, &questionnaire).await?;

    let status = req.status.unwrap_or(AssessmentStatus::Completed);
    let responses = score_responses(&questions, &answers, completeness(status))?;

    let now = jiff::Timestamp::now();
    let mut assessment = Assessment {
        id: Uuid::new_v4(),
        patient_id,
        questionnaire_id,
        status: AssessmentStatus::Pending,
        risk_score: total_score(&responses),
        responses,
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    assessment.set_status(status, now);
    documents::save(&state.store, &keys::assessment(assessment.id), &assessment).await?;

    tracing::info!(
        resource = "assessment",
        id = %assessment.id,
        patient_id = %patient_id,
        risk_score = assessment.risk_score,
        status = status.as_str(),
        "assessment created"
    );
    Ok((StatusCode::CREATED, Json(assessment)))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(load_or_404(&state, &keys::assessment(id), "Assessment").await?))
}

/// Replace answers and/or change status, then rescore against the current
/// questions.
pub async fn update_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateAssessmentRequest>,
) -> Result<Json<Assessment>, ApiError> {
    let key = keys::assessment(id);
    // The questionnaire of an assessment never changes, so its questions can
    // be resolved once, outside the guarded update.
    let current: Assessment = load_or_404(&state, &key, "Assessment").await?;
    let questionnaire: Option<Questionnaire> =
        documents::load_optional(&state.store, &keys::questionnaire(current.questionnaire_id))
            .await?;
    let questions = match &questionnaire {
        Some(q) => load_questions(&state, q).await?,
        None => Vec::new(),
    };

    let now = jiff::Timestamp::now();
    let (assessment, status) = update_or_404(
        &state,
        &key,
        "Assessment",
        |assessment: &mut Assessment| {
            let status = req.status.unwrap_or(assessment.status);
            match &req.responses {
                Some(answers) => {
                    assessment.responses =
                        score_responses(&questions, answers, completeness(status))?;
                }
                None => {
                    if status == AssessmentStatus::Completed && assessment.status != status {
                        check_required(&questions, assessment)?;
                    }
                    rescore(&questions, &mut assessment.responses);
                }
            }

            assessment.risk_score = total_score(&assessment.responses);
            assessment.set_status(status, now);
            assessment.updated_at = now;
            Ok(status)
        },
    )
    .await?;

    tracing::info!(
        resource = "assessment",
        id = %id,
        risk_score = assessment.risk_score,
        status = status.as_str(),
        "assessment updated"
    );
    Ok(Json(assessment))
}

/// Completing a saved assessment without new answers still requires every
/// required question to have been answered.
fn check_required(questions: &[Question], assessment: &Assessment) -> Result<(), ApiError> {
    let answers: HashMap<Uuid, Value> = assessment
        .responses
        .iter()
        .filter(|r| questions.iter().any(|q| q.id == r.question_id))
        .map(|r| (r.question_id, r.answer.clone()))
        .collect();
    score_responses(questions, &answers, Completeness::Complete)?;
    Ok(())
}

pub async fn delete_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = keys::assessment(id);
    if !documents::exists(&state.store, &key).await? {
        return Err(ApiError::not_found("Assessment"));
    }
    state.store.delete(&key).await?;

    tracing::info!(resource = "assessment", id = %id, "assessment deleted");
    Ok(Json(MessageResponse::new("Assessment removed")))
}

/// A patient's assessments, newest first.
pub async fn list_patient_assessments(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<PatientAssessment>>, ApiError> {
    if !documents::exists(&state.store, &keys::patient(patient_id)).await? {
        return Err(ApiError::not_found("Patient"));
    }

    let mut assessments: Vec<Assessment> = all_assessments(&state)
        .await?
        .into_iter()
        .filter(|a| a.patient_id == patient_id)
        .collect();
    newest_first(&mut assessments);

    let mut titles: HashMap<Uuid, Option<String>> = HashMap::new();
    let mut listed = Vec::with_capacity(assessments.len());
    for assessment in assessments {
        let questionnaire_title = match titles.get(&assessment.questionnaire_id) {
            Some(title) => title.clone(),
            None => {
                let title = documents::load_optional::<Questionnaire>(
                    &state.store,
                    &keys::questionnaire(assessment.questionnaire_id),
                )
                .await?
                .map(|q| q.title);
                titles.insert(assessment.questionnaire_id, title.clone());
                title
            }
        };
        listed.push(PatientAssessment {
            assessment,
            questionnaire_title,
        });
    }

    Ok(Json(listed))
}

/// Download assessments as CSV, oldest first, optionally filtered by
/// questionnaire and patient.
pub async fn export_assessments(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut assessments: Vec<Assessment> = all_assessments(&state)
        .await?
        .into_iter()
        .filter(|a| query.questionnaire_id.is_none_or(|id| a.questionnaire_id == id))
        .filter(|a| query.patient_id.is_none_or(|id| a.patient_id == id))
        .collect();
    assessments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let lookup = export_lookup(&state).await?;
    let csv = assessments_csv(&assessments, &lookup)?;

    tracing::info!(rows = assessments.len(), "assessments exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"assessments.csv\"",
            ),
        ],
        csv,
    ))
}

async fn export_lookup(state: &AppState) -> Result<ExportLookup, ApiError> {
    let patients: Vec<Patient> = documents::load_all(&state.store, keys::PATIENTS_PREFIX).await?;
    let questionnaires: Vec<Questionnaire> =
        documents::load_all(&state.store, keys::QUESTIONNAIRES_PREFIX).await?;
    let questions: Vec<Question> =
        documents::load_all(&state.store, keys::QUESTIONS_PREFIX).await?;

    Ok(ExportLookup {
        patients: patients.into_iter().map(|p| (p.id, p)).collect(),
        questionnaires: questionnaires.into_iter().map(|q| (q.id, q)).collect(),
        questions: questions.into_iter().map(|q| (q.id, q)).collect(),
    })
}
