use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections render as `400 {"message": ...}`
/// like every other validation failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
