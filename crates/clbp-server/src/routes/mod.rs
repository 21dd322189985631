use serde::Serialize;
use serde::de::DeserializeOwned;

use clbp_storage::documents;

use crate::error::ApiError;
use crate::state::AppState;

pub mod admin;
pub mod assessments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod installer;
pub mod notes;
pub mod patients;
pub mod predict;
pub mod questionnaires;
pub mod settings;
pub mod status;
pub mod users;

/// `{"message": ...}` body for acknowledgements.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Load a document, mapping a missing key to `404 "<what> not found"`.
pub(crate) async fn load_or_404<T: DeserializeOwned>(
    state: &AppState,
    key: &str,
    what: &str,
) -> Result<T, ApiError> {
    documents::load_optional(&state.store, key)
        .await?
        .ok_or_else(|| ApiError::not_found(what))
}

/// Read-modify-write a document under optimistic locking, mapping a missing
/// key to `404 "<what> not found"`. `apply` may run more than once.
pub(crate) async fn update_or_404<T, R, F>(
    state: &AppState,
    key: &str,
    what: &str,
    apply: F,
) -> Result<(T, R), ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnMut(&mut T) -> Result<R, ApiError>,
{
    documents::update(&state.store, key, apply)
        .await?
        .ok_or_else(|| ApiError::not_found(what))
}
