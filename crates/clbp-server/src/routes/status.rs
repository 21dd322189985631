use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::users;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InstallStatus {
    pub installed: bool,
}

/// Whether the installer has finished, i.e. an admin account exists.
pub async fn install_status(State(state): State<AppState>) -> Result<Json<InstallStatus>, ApiError> {
    let installed = users::admin_exists(&state).await?;
    Ok(Json(InstallStatus { installed }))
}
