use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;

/// Errors surfaced to API clients
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The `text` field is absent, null or empty
    #[error("No text provided")]
    MissingInput,

    /// The body is not JSON or does not match the request shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Tokenization or the forward pass failed. Details are logged, not returned.
    #[error("Inference failed")]
    Inference,
}

impl ApiError {
    /// The HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}
