use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Error type for a single notification request.
///
/// Caller-fault kinds (`InvalidInput`, `UserNotFound`) map to 400, everything
/// else is a server fault and maps to 500. The `Display` text is what the
/// caller sees in the `message` field of the response body.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Caller errors =====
    #[error("{0}")]
    InvalidInput(String),

    #[error("user not found")]
    UserNotFound(i64),

    // ===== Server errors =====
    #[error("failed to marshal notification: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("failed to unmarshal notification: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Kafka send failed: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UserNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::Encoding(_)
            | AppError::Decoding(_)
            | AppError::Publish(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::Encoding(_) => "ENCODING_ERROR",
            AppError::Decoding(_) => "DECODING_ERROR",
            AppError::Publish(_) => "PUBLISH_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Log this error with a level matching who is at fault
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Helper functions for creating common errors
// ============================================================================

impl AppError {
    /// Create an input validation error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    /// Create a publish error
    pub fn publish(msg: impl Into<String>) -> Self {
        AppError::Publish(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
