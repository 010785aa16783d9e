//! API error types and responses.
//!
//! Every error body has the same shape, `{"status": "error", "message": ...}`.
//! Refusals the client is expected to handle (unknown user, duplicate email,
//! bad credentials) are reported with HTTP 200; malformed requests and
//! storage failures with HTTP 500.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::media::MediaError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A looked-up user, trainee or result does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Login refused.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request body, query or form could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The table store failed.
    #[error("store error: {0}")]
    Store(#[from] lms_store::StoreError),

    /// Media could not be decoded or written.
    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

const STORE_REMEDIATION: &str = "Could not reach the record store. Check STORE_BACKEND and \
     the backend settings (SHEETS_SPREADSHEET_ID and SHEETS_ACCESS_TOKEN for sheets, DATA_DIR \
     for rocksdb), then retry.";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) | Self::Conflict(msg) | Self::Unauthorized(msg) => {
                (StatusCode::OK, msg)
            }
            Self::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Rejected request");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "Store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{STORE_REMEDIATION} ({err})"),
                )
            }
            Self::Media(err) => {
                tracing::error!(error = %err, "Media failure");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            status: "error",
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// JSON body extractor that reports rejections as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that reports rejections as [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn refusals_are_reported_with_200() {
        let (status, body) = render(ApiError::NotFound("Trainee not found".into())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Trainee not found");
    }

    #[tokio::test]
    async fn store_failures_explain_the_remedy() {
        let err = lms_store::StoreError::Backend("connection refused".into());
        let (status, body) = render(ApiError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("STORE_BACKEND"));
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn internal_details_stay_in_logs() {
        let (status, body) = render(ApiError::Internal("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }
}
