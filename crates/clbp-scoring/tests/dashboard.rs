use uuid::Uuid;

use clbp_core::models::assessment::{Assessment, AssessmentStatus};
use clbp_scoring::dashboard::{MODEL_ACCURACY_PLACEHOLDER, summarize};

fn assessment(status: AssessmentStatus, risk_score: f64) -> Assessment {
    let now = jiff::Timestamp::now();
    Assessment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        questionnaire_id: Uuid::new_v4(),
        status,
        responses: Vec::new(),
        risk_score,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn empty_store_reports_zeroes() {
    let metrics = summarize(0, &[]);
    assert_eq!(metrics.total_patients, 0);
    assert_eq!(metrics.completion_rate, 0.0);
    assert_eq!(metrics.risk_distribution.low, 0.0);
    assert_eq!(metrics.model_accuracy, MODEL_ACCURACY_PLACEHOLDER);
}

#[test]
fn completion_and_distribution_are_percentages() {
    let assessments = vec![
        assessment(AssessmentStatus::Completed, 10.0),
        assessment(AssessmentStatus::Completed, 55.0),
        assessment(AssessmentStatus::Completed, 90.0),
        assessment(AssessmentStatus::Pending, 0.0),
        assessment(AssessmentStatus::InProgress, 80.0),
        assessment(AssessmentStatus::Completed, 12.0),
    ];

    let metrics = summarize(4, &assessments);
    assert_eq!(metrics.total_patients, 4);
    assert_eq!(metrics.completion_rate, 66.7);
    assert_eq!(metrics.risk_distribution.low, 50.0);
    assert_eq!(metrics.risk_distribution.moderate, 25.0);
    assert_eq!(metrics.risk_distribution.high, 25.0);
}
