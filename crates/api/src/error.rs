//! Handler error type and its JSON rendering.
//!
//! Every failure leaves the service as `{"error": <message>, "code": <CODE>}`.
//! Internal details are logged and replaced with a fixed message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qms_core::error::CoreError;
use serde_json::json;

const HIDDEN_INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error returned by the checklist handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed request that never reached the engine.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Core(CoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Core(CoreError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Core(CoreError::Internal(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => {
                format!("{entity} with id {id} not found")
            }
            AppError::Core(CoreError::Validation(msg) | CoreError::Conflict(msg))
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Request failed with an internal error");
                HIDDEN_INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = json!({
            "error": self.client_message(),
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}
