use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use simcheck::EngineError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Request timeout")]
    Timeout,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Engine(err) => match err {
                EngineError::Validation(_) | EngineError::Decoding { .. } => {
                    StatusCode::BAD_REQUEST
                }
                EngineError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                EngineError::EmptyInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Engine(err) => match err {
                EngineError::Validation(_) => "VALIDATION_ERROR",
                EngineError::Decoding { .. } => "DECODING_ERROR",
                EngineError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
                EngineError::EmptyInput(_) => "EMPTY_INPUT",
                EngineError::Config(_) => "CONFIG_ERROR",
            },
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    fn to_body(&self) -> ErrorResponse {
        let (error, details) = match self {
            ServerError::Engine(EngineError::Decoding { name, reason }) => {
                (format!("Error reading file: {name}"), Some(reason.clone()))
            }
            // Internals stay in the logs.
            ServerError::Internal(_) | ServerError::Engine(EngineError::Config(_)) => (
                "An error occurred while processing your request".to_string(),
                None,
            ),
            other => (other.to_string(), None),
        };
        ErrorResponse {
            error,
            code: self.error_code().to_string(),
            details,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(err: MultipartRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(err.body_text())
        } else {
            ServerError::BadRequest(err.body_text())
        }
    }
}

impl From<BytesRejection> for ServerError {
    fn from(err: BytesRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(err.body_text())
        } else {
            ServerError::BadRequest(err.body_text())
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("worker task failed: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_stable_codes() {
        let cases = [
            (
                EngineError::Validation("x".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                EngineError::Decoding {
                    name: "a.pdf".into(),
                    reason: "bad xref".into(),
                },
                StatusCode::BAD_REQUEST,
                "DECODING_ERROR",
            ),
            (
                EngineError::UnsupportedMediaType {
                    name: "a.png".into(),
                    media_type: ".png".into(),
                },
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
            ),
            (
                EngineError::EmptyInput("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_INPUT",
            ),
            (
                EngineError::Config("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let err = ServerError::from(err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn decoding_error_carries_details() {
        let body = ServerError::from(EngineError::Decoding {
            name: "essay.docx".into(),
            reason: "missing word/document.xml".into(),
        })
        .to_body();
        assert_eq!(body.error, "Error reading file: essay.docx");
        assert_eq!(body.details.as_deref(), Some("missing word/document.xml"));
    }

    #[test]
    fn internal_messages_are_not_exposed() {
        let body = ServerError::Internal("disk on fire".into()).to_body();
        assert!(!body.error.contains("disk"));
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(body.details.is_none());
    }
}
