use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use personachat::{PromptError, ValidationError};
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be read or failed validation.
    Validation(String),
    /// No persona is registered under the requested name.
    UnknownPersona(String),
    /// Errors originating from the `personachat` pipeline.
    Prompt(PromptError),
    /// The request did not finish preparing within the configured bound.
    Timeout(u64),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Validation(message) => {
                warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::UnknownPersona(name) => (
                StatusCode::NOT_FOUND,
                format!("unknown persona '{name}'"),
            ),
            AppError::Prompt(err) => {
                // Log the original error for debugging purposes
                error!("PromptError: {:?}", err);
                let status = if err.is_configuration() {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    match err {
                        PromptError::JsonSerialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
                        _ => StatusCode::BAD_GATEWAY,
                    }
                };
                (status, err.to_string())
            }
            AppError::Timeout(secs) => {
                error!("Request timed out after {secs}s");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("request timed out after {secs} seconds"),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
