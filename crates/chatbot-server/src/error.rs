//! Service error types.
//!
//! Every failure is answered with the same body shape as a reply,
//! `{"response": ...}`, so clients display the explanation in place of one.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatbot_core::ChatResponse;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please enter a message.")]
    EmptyMessage,

    #[error("Request to API failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::EmptyMessage => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Upstream(_) | AppError::Internal(_) => {
                error!(error = %self, "chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", self))
            }
        };
        (status, Json(ChatResponse::reply(&message))).into_response()
    }
}
