//! API error types with IntoResponse
//!
//! Errors are converted to the response envelope with an HTTP status.
//! There is no error code beyond the status; the message carries the detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{ResponseEnvelope, ValidationError};
use crate::store::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Client input rejected (400)
    Validation(ValidationError),

    /// Store call failed (500, logged)
    Store {
        context: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Attach a handler-specific prefix to a store failure
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Store { context, source } => format!("{}: {}", context, source),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        match &self {
            Self::Validation(_) => tracing::debug!(%message, "rejected request"),
            Self::Store { .. } => tracing::error!(%message, "store error"),
        }

        ResponseEnvelope::failure(message)
            .with_status(status)
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
