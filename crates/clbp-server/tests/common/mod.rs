#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use clbp_server::app;
use clbp_server::config::ServerConfig;
use clbp_server::state::AppState;
use clbp_storage::store::DocumentStore;

pub const ADMIN_EMAIL: &str = "admin@clinic.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub router: Router,
    pub store: DocumentStore,
    pub config_path: PathBuf,
    _dir: TempDir,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("clbp.json");
    let config = ServerConfig {
        jwt_secret: Some("integration-test-secret".to_string()),
        predict_delay_ms: 0,
        ..Default::default()
    };

    let store = DocumentStore::memory();
    app::seed_settings(&store).await.unwrap();
    let router = app::router(AppState::new(store.clone(), config, config_path.clone()));

    TestApp {
        router,
        store,
        config_path,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> RawResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        RawResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, token, body).await;
        let json = response.json();
        (response.status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Run the installer's admin step and log in as that admin.
    pub async fn admin_token(&self) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/api/installer/create-admin",
                None,
                Some(json!({
                    "firstName": "Grace",
                    "lastName": "Hopper",
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a clinician through the admin API and log in as them.
    pub async fn clinician_token(&self, admin: &str, email: &str) -> String {
        let (status, _) = self
            .post(
                "/api/users",
                admin,
                json!({
                    "firstName": "Jonas",
                    "lastName": "Salk",
                    "email": email,
                    "password": "clinician-pass",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login(email, "clinician-pass").await
    }

    pub async fn create_patient(&self, token: &str, first: &str, last: &str) -> String {
        let (status, body) = self
            .post(
                "/api/patients",
                token,
                json!({ "firstName": first, "lastName": last }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_questionnaire(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .post("/api/questionnaires", token, json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn add_question(&self, token: &str, questionnaire_id: &str, question: Value) -> String {
        let (status, body) = self
            .post(
                &format!("/api/questionnaires/{questionnaire_id}/questions"),
                token,
                question,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}
