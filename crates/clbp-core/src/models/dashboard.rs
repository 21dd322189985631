use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Percentages of completed assessments per risk band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskDistribution {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardMetrics {
    pub total_patients: usize,
    pub completion_rate: f64,
    pub risk_distribution: RiskDistribution,
    pub model_accuracy: f64,
}
