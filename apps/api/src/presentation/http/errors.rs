//! HTTP error handling and response conversion.
//!
//! Errors fall into two groups. Client input errors (no file, malformed or oversized
//! body) answer with `{ "error": <message> }`. Storage failures answer with
//! `{ "message": "Failed", "error": <raw message> }` so the dashboard can show what the
//! disk or the provider reported.

use crate::domain::upload::errors::UploadError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// The form carried no usable file (400).
    NoFile,

    /// Request body could not be parsed (400).
    BadRequest(String),

    /// Request body exceeded the configured limit (413).
    PayloadTooLarge(String),

    /// Writing to disk or uploading to the provider failed (500).
    Storage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => write!(f, "No files received."),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            Self::NoFile => json!({ "error": "No files received." }),
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) => json!({ "error": msg }),
            Self::Storage(msg) => json!({ "message": "Failed", "error": msg }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => AppError::NoFile,
            UploadError::InvalidForm(msg) => AppError::BadRequest(msg),
            UploadError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            UploadError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::PayloadTooLarge(err.body_text())
        } else {
            UploadError::InvalidForm(err.body_text())
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        UploadError::from(err).into()
    }
}

/// A body that is not `multipart/form-data` at all never reaches the handler.
impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}
