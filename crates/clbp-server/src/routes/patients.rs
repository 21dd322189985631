use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use clbp_core::keys;
use clbp_core::models::assessment::Assessment;
use clbp_core::models::note::Note;
use clbp_core::models::patient::{Patient, PatientDraft};
use clbp_storage::documents;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::{MessageResponse, load_or_404, update_or_404};
use crate::state::AppState;

pub(crate) async fn all_patients(state: &AppState) -> Result<Vec<Patient>, ApiError> {
    let mut patients: Vec<Patient> =
        documents::load_all(&state.store, keys::PATIENTS_PREFIX).await?;
    patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(patients)
}

/// All patients, newest first.
pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(all_patients(&state).await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<PatientDraft>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = Patient::from_draft(draft, jiff::Timestamp::now())?;
    documents::save(&state.store, &keys::patient(patient.id), &patient).await?;

    tracing::info!(resource = "patient", id = %patient.id, "patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(load_or_404(&state, &keys::patient(id), "Patient").await?))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(draft): ApiJson<PatientDraft>,
) -> Result<Json<Patient>, ApiError> {
    let now = jiff::Timestamp::now();
    let (patient, ()) = update_or_404(
        &state,
        &keys::patient(id),
        "Patient",
        |patient: &mut Patient| {
            patient.apply(draft.clone(), now);
            Ok(())
        },
    )
    .await?;

    tracing::info!(resource = "patient", id = %id, "patient updated");
    Ok(Json(patient))
}

/// Delete a patient together with their assessments and notes.
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = keys::patient(id);
    if !documents::exists(&state.store, &key).await? {
        return Err(ApiError::not_found("Patient"));
    }

    let assessments: Vec<Assessment> =
        documents::load_all(&state.store, keys::ASSESSMENTS_PREFIX).await?;
    let mut removed_assessments = 0;
    for assessment in assessments.iter().filter(|a| a.patient_id == id) {
        state.store.delete(&keys::assessment(assessment.id)).await?;
        removed_assessments += 1;
    }

    let notes: Vec<Note> = documents::load_all(&state.store, keys::NOTES_PREFIX).await?;
    let mut removed_notes = 0;
    for note in notes.iter().filter(|n| n.patient_id == id) {
        state.store.delete(&keys::note(note.id)).await?;
        removed_notes += 1;
    }

    state.store.delete(&key).await?;

    tracing::info!(
        resource = "patient",
        id = %id,
        assessments = removed_assessments,
        notes = removed_notes,
        "patient deleted"
    );
    Ok(Json(MessageResponse::new("Patient removed")))
}
