//! Error types for fixcam-dx
//!
//! The diagnosis core speaks `DiagnosisError` kinds; only the route layer
//! translates kinds into HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Core diagnosis pipeline error taxonomy
#[derive(Debug, Error)]
pub enum DiagnosisError {
    /// Unparseable input bytes/format; client-caused, not retried
    #[error("Invalid media: {0}")]
    InvalidMedia(String),

    /// Transport/provider error calling the vision model
    #[error("Inference failed: {0}")]
    InferenceFailure(String),

    /// Provider reports the requested model is absent or incompatible
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Model returned text that could not be reduced to a structured record.
    /// Carries the offending text for diagnostics.
    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// Record parsed as JSON but is missing fields required for assembly
    #[error("Invalid structured record: {0}")]
    InvalidStructuredRecord(String),

    /// Referenced project or sub-entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Image model call or decode failed; non-fatal, step stays retryable
    #[error("Asset generation failed: {0}")]
    AssetGenerationFailure(String),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<fixcam_common::Error> for DiagnosisError {
    fn from(err: fixcam_common::Error) -> Self {
        match err {
            fixcam_common::Error::NotFound(msg) => DiagnosisError::NotFound(msg),
            fixcam_common::Error::Database(e) => DiagnosisError::Database(e),
            fixcam_common::Error::InvalidInput(msg) => DiagnosisError::InvalidMedia(msg),
            other => DiagnosisError::InferenceFailure(other.to_string()),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream model failure (502)
    #[error("Upstream failure: {0}")]
    BadGateway(String),

    /// Requested model unavailable at the provider (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// fixcam-common error
    #[error("Common error: {0}")]
    Common(#[from] fixcam_common::Error),
}

impl From<DiagnosisError> for ApiError {
    fn from(err: DiagnosisError) -> Self {
        match err {
            DiagnosisError::InvalidMedia(msg) => ApiError::BadRequest(msg),
            DiagnosisError::NotFound(msg) => ApiError::NotFound(msg),
            DiagnosisError::ModelUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            DiagnosisError::InferenceFailure(msg) => ApiError::BadGateway(msg),
            DiagnosisError::MalformedResponse { reason, raw } => {
                // Offending text is logged, not echoed to the client
                tracing::warn!(raw = %raw, "Malformed model response");
                ApiError::BadGateway(format!("Model response was not parseable: {}", reason))
            }
            DiagnosisError::InvalidStructuredRecord(msg) => {
                ApiError::BadGateway(format!("Model response missing required fields: {}", msg))
            }
            DiagnosisError::AssetGenerationFailure(msg) => ApiError::BadGateway(msg),
            DiagnosisError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(fixcam_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(fixcam_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
