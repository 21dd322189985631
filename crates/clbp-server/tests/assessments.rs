mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::{Value, json};

use common::TestApp;

struct Fixture {
    token: String,
    patient: String,
    questionnaire: String,
    frequency: String,
    regions: String,
    pain: String,
    comments: String,
}

async fn fixture(app: &TestApp) -> Fixture {
    let token = app.admin_token().await;
    let patient = app.create_patient(&token, "Ada", "Lovelace").await;
    let questionnaire = app.create_questionnaire(&token, "Back pain intake").await;

    let frequency = app
        .add_question(
            &token,
            &questionnaire,
            json!({
                "text": "How often do you have pain?",
                "questionType": "multiple-choice",
                "options": [
                    { "label": "Never", "score": 0 },
                    { "label": "Sometimes", "score": 1.5 },
                    { "label": "Often", "score": 3 }
                ],
                "isRequired": true
            }),
        )
        .await;
    let regions = app
        .add_question(
            &token,
            &questionnaire,
            json!({
                "text": "Where does it hurt?",
                "questionType": "checkboxes",
                "options": [{ "label": "Neck", "score": 2 }, { "label": "Lower back", "score": 4 }]
            }),
        )
        .await;
    let pain = app
        .add_question(
            &token,
            &questionnaire,
            json!({ "text": "Pain today", "questionType": "linear-scale", "minScale": 0, "maxScale": 10 }),
        )
        .await;
    let comments = app
        .add_question(
            &token,
            &questionnaire,
            json!({ "text": "Anything else?", "questionType": "paragraph" }),
        )
        .await;

    Fixture {
        token,
        patient,
        questionnaire,
        frequency,
        regions,
        pain,
        comments,
    }
}

fn score_of(assessment: &Value, question_id: &str) -> f64 {
    assessment["responses"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["questionId"] == question_id)
        .and_then(|r| r["score"].as_f64())
        .unwrap()
}

#[tokio::test]
async fn created_assessment_is_scored_and_completed() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.frequency.clone(), json!("Often"));
    responses.insert(f.regions.clone(), json!(["Neck", "Lower back", "Neck"]));
    responses.insert(f.pain.clone(), json!("7"));
    responses.insert(f.comments.clone(), json!("Worse in the morning"));

    let (status, body) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({
                "patientId": f.patient,
                "questionnaireId": f.questionnaire,
                "responses": responses,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    assert_eq!(body["status"], "completed");
    assert!(body["completedAt"].is_string());
    assert_eq!(score_of(&body, &f.frequency), 3.0);
    assert_eq!(score_of(&body, &f.regions), 6.0);
    assert_eq!(score_of(&body, &f.pain), 7.0);
    assert_eq!(score_of(&body, &f.comments), 0.0);
    assert_eq!(body["riskScore"].as_f64().unwrap(), 16.0);

    let order: Vec<&str> = body["responses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["questionId"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![f.frequency.as_str(), f.regions.as_str(), f.pain.as_str(), f.comments.as_str()]);
}

#[tokio::test]
async fn unmatched_choice_and_non_numeric_scale_score_zero() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.frequency.clone(), json!("Daily"));
    responses.insert(f.pain.clone(), json!("severe"));

    let (status, body) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({ "patientId": f.patient, "questionnaireId": f.questionnaire, "responses": responses }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["riskScore"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let (status, body) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({ "patientId": f.patient, "questionnaireId": f.questionnaire }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Patient ID, Questionnaire ID, and responses are required"
    );
}

#[tokio::test]
async fn unknown_patient_or_questionnaire_is_not_found() {
    let app = common::spawn().await;
    let f = fixture(&app).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({ "patientId": missing, "questionnaireId": f.questionnaire, "responses": {} }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found");

    let (status, body) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({ "patientId": f.patient, "questionnaireId": missing, "responses": {} }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Questionnaire not found");
}

#[tokio::test]
async fn required_answers_are_enforced_only_on_completion() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.pain.clone(), json!(4));
    let body = json!({
        "patientId": f.patient,
        "questionnaireId": f.questionnaire,
        "responses": responses,
    });

    let (status, _) = app.post("/api/assessments", &f.token, body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut draft = body;
    draft["status"] = json!("in-progress");
    let (status, saved) = app.post("/api/assessments", &f.token, draft).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["status"], "in-progress");
    assert!(saved.get("completedAt").is_none());

    let id = saved["id"].as_str().unwrap();
    let (status, _) = app
        .put(&format!("/api/assessments/{id}"), &f.token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut answers = serde_json::Map::new();
    answers.insert(f.pain.clone(), json!(4));
    answers.insert(f.frequency.clone(), json!("Sometimes"));
    let (status, done) = app
        .put(
            &format!("/api/assessments/{id}"),
            &f.token,
            json!({ "status": "completed", "responses": answers }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{done}");
    assert_eq!(done["status"], "completed");
    assert_eq!(done["riskScore"].as_f64().unwrap(), 5.5);
    assert!(done["completedAt"].is_string());
}

#[tokio::test]
async fn answers_for_foreign_questions_are_rejected() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(uuid::Uuid::new_v4().to_string(), json!("x"));
    let (status, _) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({
                "patientId": f.patient,
                "questionnaireId": f.questionnaire,
                "responses": responses,
                "status": "in-progress"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patient_listing_is_newest_first_with_titles() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut ids = Vec::new();
    for answer in ["Never", "Often"] {
        let mut responses = serde_json::Map::new();
        responses.insert(f.frequency.clone(), json!(answer));
        let (_, body) = app
            .post(
                "/api/assessments",
                &f.token,
                json!({ "patientId": f.patient, "questionnaireId": f.questionnaire, "responses": responses }),
            )
            .await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, list) = app
        .get(&format!("/api/assessments/patient/{}", f.patient), &f.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], ids[1].as_str());
    assert_eq!(list[0]["questionnaireTitle"], "Back pain intake");
}

#[tokio::test]
async fn get_and_delete_assessment() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.frequency.clone(), json!("Never"));
    let (_, created) = app
        .post(
            "/api/assessments",
            &f.token,
            json!({ "patientId": f.patient, "questionnaireId": f.questionnaire, "responses": responses }),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = app.get(&format!("/api/assessments/{id}"), &f.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = app.delete(&format!("/api/assessments/{id}"), &f.token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/assessments/{id}"), &f.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Assessment not found");
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.frequency.clone(), json!("Often"));
    responses.insert(f.regions.clone(), json!(["Neck"]));
    app.post(
        "/api/assessments",
        &f.token,
        json!({ "patientId": f.patient, "questionnaireId": f.questionnaire, "responses": responses }),
    )
    .await;

    let response = app
        .raw(Method::GET, "/api/assessments/export", Some(&f.token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert!(
        response.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("assessments.csv")
    );

    let lines: Vec<&str> = response.body.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("assessment_id,patient_id,patient_name"));
    assert!(lines[1].contains("Ada Lovelace"));
    assert!(lines[1].contains("How often do you have pain?,Often,3"));

    let other = uuid::Uuid::new_v4();
    let filtered = app
        .raw(
            Method::GET,
            &format!("/api/assessments/export?patientId={other}"),
            Some(&f.token),
            None,
        )
        .await;
    assert_eq!(filtered.body.split("\r\n").filter(|l| !l.is_empty()).count(), 1);
}

#[tokio::test]
async fn deleting_a_patient_removes_their_assessments_and_notes() {
    let app = common::spawn().await;
    let f = fixture(&app).await;

    let mut responses = serde_json::Map::new();
    responses.insert(f.frequency.clone(), json!("Never"));
    app.post(
        "/api/assessments",
        &f.token,
        json!({ "patientId": f.patient, "questionnaireId": f.questionnaire, "responses": responses }),
    )
    .await;
    app.post(
        "/api/notes",
        &f.token,
        json!({ "patientId": f.patient, "content": "Follow up in two weeks" }),
    )
    .await;

    let (status, _) = app.delete(&format!("/api/patients/{}", f.patient), &f.token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, assessments) = app.get("/api/assessments", &f.token).await;
    assert!(assessments.as_array().unwrap().is_empty());
    assert!(app.store.list(clbp_core::keys::NOTES_PREFIX).await.unwrap().is_empty());

    let (status, _) = app.get(&format!("/api/patients/{}", f.patient), &f.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
