//! API error type with flat `{"error": ...}` JSON bodies.
//!
//! Routes with irregular failure envelopes (sample_docs, the LLM routes)
//! build their bodies in the handler; everything else maps through here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request field is absent. 400.
    #[error("{0}")]
    MissingField(&'static str),

    /// The document store failed. 500.
    #[error("{0}")]
    Store(String),

    /// Anything else on the server side. 500.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(detail) => {
                tracing::error!(detail, "document store error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err.to_string())
    }
}
