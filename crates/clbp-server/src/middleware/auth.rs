use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use clbp_auth::token;
use clbp_core::models::user::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Session token middleware.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the JWT
/// against the server's signing secret. On success, inserts [`AuthUser`]
/// into the request extensions for handlers and copies it onto the response
/// for the audit log.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let auth_header = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let bearer = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        token::validate_token(bearer, state.config.signing_secret())?
    };

    let user = AuthUser {
        id: claims.sub,
        role: claims.role,
    };
    req.extensions_mut().insert(user.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Authenticated user extracted from session token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin role required".to_string()))
        }
    }
}
