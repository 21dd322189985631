use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::risk::RiskLevel;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    #[serde(default)]
    pub responses: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub selected_body_regions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PredictionResult {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub recommended_action: String,
    pub timestamp: jiff::Timestamp,
}
