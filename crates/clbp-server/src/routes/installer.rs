use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clbp_auth::secret;
use clbp_core::models::user::{Role, User};
use clbp_storage::settings::StoreSettings;
use clbp_storage::store::DocumentStore;

use crate::config::{self, CURRENT_VERSION, ServerConfig};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::{MessageResponse, users};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteConfigRequest {
    pub store: StoreSettings,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminResponse {
    pub message: String,
    pub admin_id: Uuid,
}

/// Check a candidate storage backend before it is written to the config.
pub async fn test_store(
    ApiJson(settings): ApiJson<StoreSettings>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = DocumentStore::open(&settings).await?;

    if let Err(e) = store.ping().await {
        tracing::warn!(backend = settings.backend_name(), error = %e, "storage check failed");
        return Err(ApiError::BadRequest(format!("Storage connection failed: {e}")));
    }

    tracing::info!(backend = settings.backend_name(), "storage check succeeded");
    Ok(Json(MessageResponse::new("Storage connection successful.")))
}

/// Write the config file with a freshly generated session secret. The
/// running server keeps its current config until restarted.
pub async fn write_config(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<WriteConfigRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if users::admin_exists(&state).await? {
        return Err(ApiError::Forbidden(
            "Installation is already complete.".to_string(),
        ));
    }
    req.store.validate()?;

    let new_config = ServerConfig {
        config_version: CURRENT_VERSION,
        port: req.port.unwrap_or(state.config.port),
        store: req.store,
        jwt_secret: Some(secret::generate_secret()),
        log_json: state.config.log_json,
        predict_delay_ms: state.config.predict_delay_ms,
    };

    let path = state.config_path.as_ref().clone();
    tokio::task::spawn_blocking(move || config::save_config(&path, &new_config))
        .await
        .map_err(|e| ApiError::Internal(format!("config writer panicked: {e}")))?
        .map_err(|e| ApiError::Internal(format!("failed to write configuration file: {e}")))?;

    Ok(Json(MessageResponse::new(
        "Configuration file written successfully. Please restart the server.",
    )))
}

/// Create the first admin account. Refused once any admin exists.
pub async fn create_admin(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<CreateAdminResponse>), ApiError> {
    let required = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        required(req.first_name),
        required(req.last_name),
        required(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "All admin fields are required.".to_string(),
        ));
    };

    if users::admin_exists(&state).await? {
        return Err(ApiError::BadRequest(
            "An admin user already exists.".to_string(),
        ));
    }

    let email = User::normalize_email(&email);
    let now = jiff::Timestamp::now();
    let admin = User {
        id: Uuid::new_v4(),
        first_name,
        last_name,
        email,
        role: Role::Admin,
        password_hash: users::hash_password(password).await?,
        created_at: now,
        updated_at: now,
    };
    users::register(&state, &admin).await?;

    tracing::info!(resource = "user", id = %admin.id, "admin account created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAdminResponse {
            message: "Admin user created successfully.".to_string(),
            admin_id: admin.id,
        }),
    ))
}
