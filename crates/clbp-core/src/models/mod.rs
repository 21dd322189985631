pub mod assessment;
pub mod dashboard;
pub mod note;
pub mod patient;
pub mod prediction;
pub mod question;
pub mod questionnaire;
pub mod risk;
pub mod setting;
pub mod user;

/// Trim an optional free-text field, collapsing blank values to `None`.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
