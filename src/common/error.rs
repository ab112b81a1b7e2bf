// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Application error type. `thiserror` gives us the conversions, the
// IntoResponse impl below decides what the client sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid multipart body")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    // Kept deliberately indistinguishable from "no access": a non-owner
    // asking for a row by id gets the same 404 as a true absence.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("email already registered")]
    EmailAlreadyExists,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("jwt error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("font not found: {0}")]
    FontNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field that failed validation, not just the first.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            AppError::MultipartError(e) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid multipart body: {e}"),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token missing or invalid".to_string(),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{resource} not found or access denied"),
            ),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Email already registered".to_string())
            }
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),

            // Unique-index violations that slipped past the application
            // checks still surface as conflicts, not opaque 500s.
            AppError::DatabaseError(sqlx::Error::Database(ref db_err))
                if db_err.is_unique_violation() =>
            {
                (StatusCode::CONFLICT, "Duplicate record".to_string())
            }

            // Everything else (DatabaseError, InternalServerError, ...) is a 500.
            // The detailed message goes to the log, not to the client.
            ref e => {
                tracing::error!("internal server error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
