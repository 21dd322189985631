//! Document key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of JSON documents in the CLBP store, whichever backend holds them.

use uuid::Uuid;

pub const PATIENTS_PREFIX: &str = "patients/";
pub const QUESTIONNAIRES_PREFIX: &str = "questionnaires/";
pub const QUESTIONS_PREFIX: &str = "questions/";
pub const ASSESSMENTS_PREFIX: &str = "assessments/";
pub const NOTES_PREFIX: &str = "notes/";
pub const SETTINGS_PREFIX: &str = "settings/";
pub const USERS_PREFIX: &str = "users/";
pub const USER_EMAILS_PREFIX: &str = "user-emails/";

pub fn patient(id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{id}.json")
}

pub fn questionnaire(id: Uuid) -> String {
    format!("{QUESTIONNAIRES_PREFIX}{id}.json")
}

pub fn question(id: Uuid) -> String {
    format!("{QUESTIONS_PREFIX}{id}.json")
}

pub fn assessment(id: Uuid) -> String {
    format!("{ASSESSMENTS_PREFIX}{id}.json")
}

pub fn note(id: Uuid) -> String {
    format!("{NOTES_PREFIX}{id}.json")
}

/// Setting keys are validated by [`crate::models::setting::normalize_key`]
/// before they reach this function, so they are safe as a path segment.
pub fn setting(key: &str) -> String {
    format!("{SETTINGS_PREFIX}{key}.json")
}

pub fn user(id: Uuid) -> String {
    format!("{USERS_PREFIX}{id}.json")
}

/// Index document mapping a normalized email to its account. The email is
/// hex-encoded so any address is a safe, collision-free path segment.
pub fn user_email(email: &str) -> String {
    format!("{USER_EMAILS_PREFIX}{}.json", hex::encode(email))
}
