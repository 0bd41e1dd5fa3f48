use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use macroplan_mealplan::GenerateError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Empty bodies are rejected the same way as oversized ones.
    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Invalid JSON body")]
    InvalidBody,

    #[error("Missing configuration: provider API key is not set")]
    MissingApiKey,

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Generate(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), err = %message, "generation failed");
        } else {
            tracing::warn!(status = status.as_u16(), err = %message, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
