use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Band a risk score: above 70 is high, above 40 moderate, else low.
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            RiskLevel::High
        } else if score > 40.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}
