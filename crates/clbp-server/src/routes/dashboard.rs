use axum::Json;
use axum::extract::State;

use clbp_core::keys;
use clbp_core::models::dashboard::DashboardMetrics;
use clbp_core::models::patient::Patient;
use clbp_scoring::dashboard;

use crate::error::ApiError;
use crate::routes::{assessments, patients};
use crate::state::AppState;

const RECENT_PATIENTS: usize = 5;

pub async fn metrics(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, ApiError> {
    let total_patients = state.store.list(keys::PATIENTS_PREFIX).await?.len();
    let assessments = assessments::all_assessments(&state).await?;
    Ok(Json(dashboard::summarize(total_patients, &assessments)))
}

pub async fn recent_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let mut patients = patients::all_patients(&state).await?;
    patients.truncate(RECENT_PATIENTS);
    Ok(Json(patients))
}
