use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use clbp_auth::password;
use clbp_core::keys;
use clbp_core::models::user::{Role, User, UserEmail, UserProfile};
use clbp_storage::documents;
use clbp_storage::error::StorageError;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

pub(crate) async fn all_users(state: &AppState) -> Result<Vec<User>, ApiError> {
    Ok(documents::load_all(&state.store, keys::USERS_PREFIX).await?)
}

pub(crate) async fn admin_exists(state: &AppState) -> Result<bool, ApiError> {
    Ok(all_users(state).await?.iter().any(|u| u.role == Role::Admin))
}

/// Look up a user by an already-normalized email through its index entry.
pub(crate) async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>, ApiError> {
    let Some(entry) =
        documents::load_optional::<UserEmail>(&state.store, &keys::user_email(email)).await?
    else {
        return Ok(None);
    };

    let user: Option<User> =
        documents::load_optional(&state.store, &keys::user(entry.user_id)).await?;
    if user.is_none() {
        tracing::warn!(user_id = %entry.user_id, "email index points at a missing user");
    }
    Ok(user)
}

/// Store a new account. Claiming the email index entry first keeps emails
/// unique even when two requests race for the same address.
pub(crate) async fn register(state: &AppState, user: &User) -> Result<(), ApiError> {
    let email_key = keys::user_email(&user.email);
    let entry = UserEmail {
        email: user.email.clone(),
        user_id: user.id,
    };
    match documents::create(&state.store, &email_key, &entry).await {
        Ok(()) => {}
        Err(StorageError::PreconditionFailed { .. }) => {
            return Err(ApiError::BadRequest(
                "A user with this email already exists.".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    if let Err(e) = documents::save(&state.store, &keys::user(user.id), user).await {
        state.store.delete(&email_key).await?;
        return Err(e.into());
    }
    Ok(())
}

/// Hash on the blocking pool; Argon2 takes tens of milliseconds.
pub(crate) async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(ApiError::from)
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    caller.require_admin()?;

    let mut users = all_users(&state).await?;
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(Json(users.iter().map(User::profile).collect()))
}

/// Create a staff account. New accounts are clinicians unless a role is
/// given.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    caller.require_admin()?;

    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    let email = User::normalize_email(&req.email);
    if first_name.is_empty() || last_name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "firstName, lastName, email and password are required".to_string(),
        ));
    }
    let now = jiff::Timestamp::now();
    let user = User {
        id: Uuid::new_v4(),
        first_name,
        last_name,
        email,
        role: req.role.unwrap_or(Role::Clinician),
        password_hash: hash_password(req.password).await?,
        created_at: now,
        updated_at: now,
    };
    register(&state, &user).await?;

    tracing::info!(resource = "user", id = %user.id, created_by = %caller.id, "user created");
    Ok((StatusCode::CREATED, Json(user.profile())))
}
