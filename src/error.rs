use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Role;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Carries the value for the `Allow` header.
    #[error("Method not allowed")]
    MethodNotAllowed(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} profile not found")]
    ProfileMissing(Role),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ProfileMissing(_)
            | ApiError::Database(_)
            | ApiError::PasswordHash(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Server-side causes stay in the log; clients get an opaque message.
        let message = if status.is_server_error() {
            tracing::error!(target: "api_error", error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut builder = HttpResponse::build(status);
        if let ApiError::MethodNotAllowed(allow) = self {
            builder.insert_header((header::ALLOW, *allow));
        }
        builder.json(json!({ "error": message }))
    }
}

/// Fallback for resources that only serve a single method.
pub fn method_not_allowed(allow: &'static str) -> ApiError {
    ApiError::MethodNotAllowed(allow)
}
