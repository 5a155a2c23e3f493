// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Every service operation fails with one of these; `IntoResponse` is the only
/// place they become HTTP statuses.
#[derive(Debug)]
pub enum AppError {
    // 500, cause is logged but never returned to the caller
    Internal(String),

    // 400 Bad Request: malformed input
    Validation(String),

    // 401: credential missing or invalid
    Authentication(String),

    // 401: authenticated, but not allowed to touch this entity
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 400: like on an already liked post
    DuplicateAction(String),

    // 400: unlike on a post that was never liked
    InvalidState(String),

    // 409 Conflict (e.g., email already registered)
    Conflict(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::DuplicateAction(_)
            | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::DuplicateAction(msg)
            | AppError::InvalidState(msg)
            | AppError::Conflict(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a `{"message": ...}` JSON body with the matching status.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Server error".to_string()
            }
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::DuplicateAction(msg)
            | AppError::InvalidState(msg)
            | AppError::Conflict(msg) => msg,
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Allows using `?` on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Unreadable or mistyped request bodies are plain validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Flattens field errors into the first human-readable message.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateAction("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidState("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Authentication("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let response = AppError::Internal("relation posts does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "message": "Server error" }));
        assert!(!String::from_utf8_lossy(&bytes).contains("relation posts"));
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let response = AppError::DuplicateAction("Post already liked".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Post already liked");
    }
}
