use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use clbp_auth::error::AuthError;
use clbp_auth::{password, token};
use clbp_core::keys;
use clbp_core::models::user::{User, UserProfile};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::routes::{load_or_404, users};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = User::normalize_email(&req.email);
    let user = users::find_by_email(&state, &email).await?;

    // Unknown emails still pay for a hash check so response times do not
    // reveal which accounts exist.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => password::verify_password(&req.password, &hash),
        None => Ok(password::verify_unknown_account(&req.password)),
    })
    .await
    .map_err(|e| ApiError::Internal(format!("password check task failed: {e}")))??;

    let Some(user) = user.filter(|_| verified) else {
        tracing::warn!("login rejected");
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = token::issue_token(user.id, user.role, state.config.signing_secret())?;
    tracing::info!(user_id = %user.id, "login");

    Ok(Json(LoginResponse {
        token,
        user: user.profile(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let user: User = load_or_404(&state, &keys::user(caller.id), "User").await?;
    Ok(Json(user.profile()))
}
