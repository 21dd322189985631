use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::routes;
use crate::state::AppState;

pub use crate::routes::settings::seed_defaults as seed_settings;

/// Build the application router. Every route lives under `/api`.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/status", get(routes::status::install_status))
        .route("/installer/test-db", post(routes::installer::test_store))
        .route(
            "/installer/write-config",
            post(routes::installer::write_config),
        )
        .route(
            "/installer/create-admin",
            post(routes::installer::create_admin),
        )
        .route("/auth/login", post(routes::auth::login))
        .route("/predict", post(routes::predict::predict));

    let protected = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/patients",
            get(routes::patients::list_patients).post(routes::patients::create_patient),
        )
        .route(
            "/patients/{id}",
            get(routes::patients::get_patient)
                .put(routes::patients::update_patient)
                .delete(routes::patients::delete_patient),
        )
        .route(
            "/questionnaires",
            get(routes::questionnaires::list_questionnaires)
                .post(routes::questionnaires::create_questionnaire),
        )
        .route(
            "/questionnaires/{id}",
            get(routes::questionnaires::get_questionnaire)
                .put(routes::questionnaires::update_questionnaire)
                .delete(routes::questionnaires::delete_questionnaire),
        )
        .route(
            "/questionnaires/{id}/questions",
            post(routes::questionnaires::add_question),
        )
        .route(
            "/questionnaires/{id}/questions/{question_id}",
            put(routes::questionnaires::update_question)
                .delete(routes::questionnaires::delete_question),
        )
        .route(
            "/assessments",
            get(routes::assessments::list_assessments)
                .post(routes::assessments::create_assessment),
        )
        .route(
            "/assessments/export",
            get(routes::assessments::export_assessments),
        )
        .route(
            "/assessments/patient/{patient_id}",
            get(routes::assessments::list_patient_assessments),
        )
        .route(
            "/assessments/{id}",
            get(routes::assessments::get_assessment)
                .put(routes::assessments::update_assessment)
                .delete(routes::assessments::delete_assessment),
        )
        .route("/notes", post(routes::notes::create_note))
        .route(
            "/notes/patient/{patient_id}",
            get(routes::notes::list_patient_notes),
        )
        .route(
            "/notes/{id}",
            get(routes::notes::get_note).delete(routes::notes::delete_note),
        )
        .route("/settings", get(routes::settings::get_settings))
        .route("/settings/{key}", put(routes::settings::put_setting))
        .route("/dashboard/metrics", get(routes::dashboard::metrics))
        .route(
            "/dashboard/recent-patients",
            get(routes::dashboard::recent_patients),
        )
        .route("/admin/env", get(routes::admin::env_info))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
