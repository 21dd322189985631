use std::time::Duration;

use axum::Json;
use axum::extract::State;

use clbp_core::models::prediction::{PredictionRequest, PredictionResult};
use clbp_scoring::prediction;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

const RECOMMENDED_ACTION: &str = "Consult with a specialist for further evaluation.";

/// Heuristic risk prediction from a questionnaire in progress.
pub async fn predict(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PredictionRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let response_count = req.responses.as_ref().map_or(0, |r| r.len());
    let region_count = req.selected_body_regions.as_ref().map_or(0, |r| r.len());

    let outcome = prediction::predict(response_count, region_count)?;

    // Stand-in for model inference latency.
    if state.config.predict_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.predict_delay_ms)).await;
    }

    let confidence = 0.85 + rand::random::<f64>() * 0.1;
    tracing::info!(
        responses = response_count,
        regions = region_count,
        risk_score = outcome.risk_score,
        "prediction served"
    );

    Ok(Json(PredictionResult {
        risk_score: outcome.risk_score,
        risk_level: outcome.risk_level,
        confidence,
        recommended_action: RECOMMENDED_ACTION.to_string(),
        timestamp: jiff::Timestamp::now(),
    }))
}
