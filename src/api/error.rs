//! Mapping of [`Error`] onto HTTP responses.
//!
//! Business-rule failures become 4xx responses carrying the error's own message.
//! Infrastructure failures are logged and answered with a sanitized 500.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

impl Error {
    /// HTTP status and stable error code for this error.
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::ExceedsOutstandingBalance { .. } => {
                (StatusCode::BAD_REQUEST, "EXCEEDS_OUTSTANDING_BALANCE")
            }
            Self::CommitmentAlreadySettled { .. } => {
                (StatusCode::BAD_REQUEST, "COMMITMENT_SETTLED")
            }
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::DuplicateName { .. } => (StatusCode::CONFLICT, "DUPLICATE_NAME"),
            Self::ConcurrentModification { .. } => {
                (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION")
            }
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Csv(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
