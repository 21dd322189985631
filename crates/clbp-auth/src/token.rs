use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clbp_core::models::user::Role;

use crate::error::AuthError;

/// Session lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, role: Role, issued_at: jiff::Timestamp) -> Self {
        let iat = issued_at.as_second();
        Self {
            sub: user_id,
            role,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }
}

/// Sign claims with the server's HS256 secret.
pub fn encode_token(claims: &SessionClaims, secret: &str) -> Result<String, AuthError> {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Issue a token for a user, valid from now.
pub fn issue_token(user_id: Uuid, role: Role, secret: &str) -> Result<String, AuthError> {
    encode_token(&SessionClaims::new(user_id, role, jiff::Timestamp::now()), secret)
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => {
                tracing::debug!(error = %e, "rejected session token");
                AuthError::InvalidToken(e.to_string())
            }
        })
}
