//! API request and response types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::TaskError;

/// Uniform wrapper around every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Liveness response for `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub environment: String,
}

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Task(TaskError::InvalidId) => StatusCode::BAD_REQUEST,
            Self::Task(TaskError::ValidationFailed(_)) => StatusCode::BAD_REQUEST,
            Self::Task(TaskError::NotFound) => StatusCode::NOT_FOUND,
            Self::Task(TaskError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("API error ({}): {}", status.as_u16(), message);
        } else {
            tracing::warn!("API error ({}): {}", status.as_u16(), message);
        }
        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}
