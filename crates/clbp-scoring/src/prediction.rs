use clbp_core::models::risk::RiskLevel;

use crate::error::ScoringError;

const BASE_RISK: u32 = 20;
const PER_RESPONSE: u32 = 2;
const PER_REGION: u32 = 5;
const MAX_RISK: u32 = 100;

/// Outcome of the heuristic predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
}

/// Heuristic risk estimate used until a trained model is deployed: risk
/// grows with the number of answered questions and selected body regions,
/// capped at 100.
pub fn predict(response_count: usize, region_count: usize) -> Result<Prediction, ScoringError> {
    if response_count == 0 {
        return Err(ScoringError::NoAssessmentData);
    }

    let responses = u32::try_from(response_count).unwrap_or(u32::MAX);
    let regions = u32::try_from(region_count).unwrap_or(u32::MAX);
    let risk_score = BASE_RISK
        .saturating_add(responses.saturating_mul(PER_RESPONSE))
        .saturating_add(regions.saturating_mul(PER_REGION))
        .min(MAX_RISK);

    Ok(Prediction {
        risk_score,
        risk_level: RiskLevel::from_score(f64::from(risk_score)),
    })
}
