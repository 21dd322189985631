use uuid::Uuid;

use clbp_auth::error::AuthError;
use clbp_auth::token::{SessionClaims, TOKEN_TTL_SECS, encode_token, issue_token, validate_token};
use clbp_core::models::user::Role;

const SECRET: &str = "unit-test-secret";

#[test]
fn issued_token_round_trips_claims() {
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, Role::Admin, SECRET).unwrap();

    let claims = validate_token(&token, SECRET).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
}

#[test]
fn wrong_secret_is_rejected() {
    let token = issue_token(Uuid::new_v4(), Role::Clinician, SECRET).unwrap();
    assert!(matches!(
        validate_token(&token, "another-secret"),
        Err(AuthError::InvalidToken(_))
    ));
}

#[test]
fn expired_token_is_rejected() {
    let issued_at =
        jiff::Timestamp::from_second(jiff::Timestamp::now().as_second() - 2 * TOKEN_TTL_SECS)
            .unwrap();
    let claims = SessionClaims::new(Uuid::new_v4(), Role::Clinician, issued_at);
    let token = encode_token(&claims, SECRET).unwrap();

    assert!(matches!(
        validate_token(&token, SECRET),
        Err(AuthError::TokenExpired)
    ));
}

#[test]
fn garbage_is_rejected() {
    assert!(validate_token("not.a.token", SECRET).is_err());
    assert!(validate_token("", SECRET).is_err());
}
