use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::AuthError;
use service::errors::ServiceError;

/// HTTP-facing error; every variant maps to one status code and a JSON
/// `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %msg, "internal error");
        } else {
            warn!(%status, error = %msg, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            // Duplicates are reported as plain bad requests.
            ServiceError::Conflict(msg) => ApiError::BadRequest(msg),
            ServiceError::Model(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::Conflict => ApiError::BadRequest("user already exists".into()),
            AuthError::NotFound => ApiError::NotFound("user not found".into()),
            AuthError::Unauthorized => ApiError::Unauthorized("invalid credentials".into()),
            AuthError::InvalidToken => ApiError::Unauthorized("invalid token".into()),
            AuthError::HashError(msg) | AuthError::TokenError(msg) | AuthError::Store(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}
