//! HTTP error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::IftarError;
use crate::generation::GenerationError;

/// `{success: false, error, error_type?}` body
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<&'static str>,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error_type: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error_type: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, error_type: &'static str) -> Self {
        self.error_type = Some(error_type);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
            error_type: self.error_type,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<IftarError> for ApiError {
    fn from(err: IftarError) -> Self {
        error!(error = %err, "Request failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.user_message())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidPrompt(message) => ApiError::bad_request(message),
            GenerationError::RateLimited => {
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, err.to_string())
                    .with_type("rate_limit")
            }
            GenerationError::Api(_) | GenerationError::EmptyResult => {
                error!(error = %err, "Image generation failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                    .with_type("api_error")
            }
        }
    }
}
