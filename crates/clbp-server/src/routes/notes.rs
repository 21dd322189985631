use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use clbp_core::keys;
use clbp_core::models::note::Note;
use clbp_storage::documents;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::routes::{MessageResponse, load_or_404};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub patient_id: Option<Uuid>,
    #[serde(alias = "content")]
    pub text: Option<String>,
    pub category: Option<String>,
}

/// A patient's notes, newest first.
pub async fn list_patient_notes(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let mut notes: Vec<Note> = documents::load_all::<Note>(&state.store, keys::NOTES_PREFIX)
        .await?
        .into_iter()
        .filter(|n| n.patient_id == patient_id)
        .collect();
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let text = req.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    let (Some(patient_id), Some(text)) = (req.patient_id, text) else {
        return Err(ApiError::BadRequest(
            "Patient ID and text are required".to_string(),
        ));
    };
    if !documents::exists(&state.store, &keys::patient(patient_id)).await? {
        return Err(ApiError::not_found("Patient"));
    }

    let now = jiff::Timestamp::now();
    let note = Note {
        id: Uuid::new_v4(),
        patient_id,
        author_id: caller.id,
        text,
        category: req
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        created_at: now,
        updated_at: now,
    };
    documents::save(&state.store, &keys::note(note.id), &note).await?;

    tracing::info!(resource = "note", id = %note.id, patient_id = %patient_id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(load_or_404(&state, &keys::note(id), "Note").await?))
}

/// Notes can be deleted by their author or an admin.
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = keys::note(id);
    let note: Note = load_or_404(&state, &key, "Note").await?;
    if note.author_id != caller.id && !caller.is_admin() {
        return Err(ApiError::Forbidden(
            "only the author or an admin can delete a note".to_string(),
        ));
    }
    state.store.delete(&key).await?;

    tracing::info!(resource = "note", id = %id, "note deleted");
    Ok(Json(MessageResponse::new("Note removed")))
}
