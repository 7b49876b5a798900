use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("invalid")]
    OtpInvalid,

    #[error("expired")]
    OtpExpired,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected server error")]
    Unexpected,
}

impl AppError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn invalid_slot<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidSlot(msg.into())
    }

    pub fn invalid_transition<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidTransition(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::ValidationError(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),

            AppError::InvalidSlot(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg.clone()),

            AppError::OtpInvalid => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::OtpExpired => (StatusCode::GONE, self.to_string()),

            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::Unexpected => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "message": message,
                "kind": format!("{:?}", self)
            }
        }));

        (status, body).into_response()
    }
}
