//! HTTP error type. Every failure leaves the server as a JSON body of the
//! form `{"error": ..., "message"?: ..., "details"?: ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use legalyze_ingest::Placeholder;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{error}")]
    BadRequest {
        error: String,
        message: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    #[error("{error}")]
    Internal {
        error: String,
        details: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        ApiError::BadRequest { error: error.into(), message: None }
    }

    pub fn internal(error: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal {
            error: error.into(),
            details: Some(details.to_string()),
        }
    }

    /// Log a storage failure and hide it behind `error`.
    pub fn storage(error: &str, e: StoreError) -> Self {
        tracing::error!("{}: {}", error, e);
        ApiError::Internal { error: error.to_string(), details: None }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Placeholder> for ApiError {
    fn from(placeholder: Placeholder) -> Self {
        ApiError::BadRequest {
            error: placeholder.error().to_string(),
            message: Some(placeholder.message().to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Storage error: {}", e);
        ApiError::Internal { error: "Internal server error".into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest { error, message } => ErrorBody {
                error,
                message: message.as_deref(),
                details: None,
            },
            ApiError::Internal { error, details } => ErrorBody {
                error,
                message: None,
                details: details.as_deref(),
            },
            ApiError::NotFound(error) => ErrorBody { error, message: None, details: None },
            ApiError::Unauthorized => ErrorBody { error: "Unauthorized", message: None, details: None },
            ApiError::Forbidden => ErrorBody { error: "Forbidden", message: None, details: None },
            ApiError::PayloadTooLarge => ErrorBody {
                error: "Uploaded file is too large",
                message: None,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
