// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::services::storage_client::StorageError;

/// Application-specific error types
/// DOCUMENTATION: One enum for every failure a request can hit
/// Validation variants are raised before any side effect happens
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported file type: {0}. Allowed types are JPEG, PNG, GIF and WebP")]
    UnsupportedMediaType(String),

    #[error("Upload too large: {0} bytes")]
    PayloadTooLarge(usize),

    #[error(
        "Storage bucket '{0}' was not found. Create a public bucket with this name \
         or set STORAGE_BUCKET to the existing bucket"
    )]
    StorageBucketMissing(String),

    #[error("Storage permission denied: {0}. Check the bucket's upload and delete policies")]
    StoragePermissionDenied(String),

    #[error("Storage is unavailable right now, please try again later ({0})")]
    StorageUnavailable(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl SiteError {
    fn code(&self) -> &'static str {
        match self {
            SiteError::NotFound(_) => "NOT_FOUND",
            SiteError::DatabaseError(_) => "DATABASE_ERROR",
            SiteError::InvalidInput(_) => "INVALID_INPUT",
            SiteError::ValidationError(_) => "VALIDATION_ERROR",
            SiteError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            SiteError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            SiteError::StorageBucketMissing(_) => "STORAGE_BUCKET_MISSING",
            SiteError::StoragePermissionDenied(_) => "STORAGE_PERMISSION_DENIED",
            SiteError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            SiteError::Unauthorized => "UNAUTHORIZED",
            SiteError::Forbidden => "FORBIDDEN",
            SiteError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

/// Convert SiteError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for SiteError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SiteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SiteError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SiteError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            SiteError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SiteError::StorageBucketMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SiteError::StoragePermissionDenied(_) => StatusCode::FORBIDDEN,
            SiteError::StorageUnavailable(_) => StatusCode::BAD_GATEWAY,
            SiteError::Unauthorized => StatusCode::UNAUTHORIZED,
            SiteError::Forbidden => StatusCode::FORBIDDEN,
            SiteError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<StorageError> for SiteError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BucketNotFound(bucket) => SiteError::StorageBucketMissing(bucket),
            StorageError::PermissionDenied(msg) => SiteError::StoragePermissionDenied(msg),
            StorageError::Transport(msg) => SiteError::StorageUnavailable(msg),
        }
    }
}
