use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to decode image: {0}")]
    InvalidImage(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Image has too many pixels: {width}x{height} (max: {max} pixels)")]
    TooManyPixels { width: u32, height: u32, max: u64 },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Sample image not found at {0}")]
    SampleNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Error processing context: {0}")]
    Weather(String),

    #[error("Error saving message: {0}")]
    ContactSave(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidImage(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            AppError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            AppError::TooManyPixels { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "TOO_MANY_PIXELS"),
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            AppError::SampleNotFound(_) => (StatusCode::NOT_FOUND, "SAMPLE_NOT_FOUND"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Weather(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONTEXT_ERROR"),
            AppError::ContactSave(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONTACT_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, "{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
