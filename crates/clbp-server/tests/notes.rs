mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn notes_are_listed_newest_first_with_author() {
    let app = common::spawn().await;
    let token = app.admin_token().await;
    let patient = app.create_patient(&token, "Ada", "Lovelace").await;

    let (_, me) = app.get("/api/auth/me", &token).await;
    let mut ids = Vec::new();
    for text in ["Initial visit", "Follow-up"] {
        let (status, note) = app
            .post(
                "/api/notes",
                &token,
                json!({ "patientId": patient, "text": text, "category": "visit" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note["authorId"], me["id"]);
        ids.push(note["id"].as_str().unwrap().to_string());
    }

    let (status, list) = app
        .get(&format!("/api/notes/patient/{patient}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], ids[1].as_str());
    assert_eq!(list[0]["text"], "Follow-up");
}

#[tokio::test]
async fn note_requires_patient_and_text() {
    let app = common::spawn().await;
    let token = app.admin_token().await;
    let patient = app.create_patient(&token, "Ada", "Lovelace").await;

    let (status, body) = app
        .post("/api/notes", &token, json!({ "patientId": patient, "text": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Patient ID and text are required");

    let (status, _) = app
        .post(
            "/api/notes",
            &token,
            json!({ "patientId": uuid::Uuid::new_v4(), "text": "Orphan" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_author_or_admin_can_delete() {
    let app = common::spawn().await;
    let admin = app.admin_token().await;
    let author = app.clinician_token(&admin, "author@clinic.test").await;
    let other = app.clinician_token(&admin, "other@clinic.test").await;
    let patient = app.create_patient(&admin, "Ada", "Lovelace").await;

    let (_, note) = app
        .post("/api/notes", &author, json!({ "patientId": patient, "text": "Mine" }))
        .await;
    let id = note["id"].as_str().unwrap();

    let (status, _) = app.delete(&format!("/api/notes/{id}"), &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&format!("/api/notes/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/notes/{id}"), &author).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
