//! API error handling
//!
//! Every failure leaves the service as `{success: false, code, message}`.
//! User-correctable failures answer 400; anything unexpected answers 500 with a
//! generic message while the underlying error is logged.
//!
//! Author: hephaex@gmail.com

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobboard_core::JobBoardError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::validation::ValidationError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always false
    pub success: bool,
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidId(_) => "INVALID_ID",
            AppError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }

        ApiError::new(self.code(), self.public_message()).into_response_with(self.status())
    }
}

impl From<JobBoardError> for AppError {
    fn from(err: JobBoardError) -> Self {
        match err {
            JobBoardError::NotFound(msg) => AppError::NotFound(msg),
            JobBoardError::InvalidId(msg) => AppError::InvalidId(msg),
            JobBoardError::Conflict(msg) => AppError::Conflict(msg),
            JobBoardError::ValidationError(msg) => AppError::Validation(msg),
            JobBoardError::DatabaseError(msg) => AppError::Internal(format!("Database error: {msg}")),
            JobBoardError::ConfigError(msg) => {
                AppError::Internal(format!("Configuration error: {msg}"))
            }
            JobBoardError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.0)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_is_bad_request() {
        let response = AppError::Conflict("Email already existed".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "CONFLICT");
        assert_eq!(json["message"], "Email already existed");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = AppError::from(JobBoardError::DatabaseError("connection reset".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
        assert!(!json.to_string().contains("connection reset"));
    }

    #[test]
    fn test_core_error_mapping() {
        let err = AppError::from(JobBoardError::InvalidId("Invalid Job ID".into()));
        assert!(matches!(err, AppError::InvalidId(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(JobBoardError::NotFound("No Job found".into()));
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
