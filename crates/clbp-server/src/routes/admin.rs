use axum::extract::State;
use axum::{Extension, Json};

use crate::config::{self, ConfigInfo};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The running configuration with secrets redacted.
pub async fn env_info(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<ConfigInfo>, ApiError> {
    caller.require_admin()?;
    Ok(Json(config::config_info(&state.config, &state.config_path)))
}
