use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chatbot_core::{ChatRequest, ChatResponse};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};

pub fn build_prompt(message: &str) -> String {
    format!(
        "You are a helpful AI chatbot. Respond to the following user message: {}",
        message
    )
}

/// `POST /chat`: answer one message.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Internal(rejection.body_text()))?;

    debug!(user_input = %request.message, "received chat message");

    if request.message.trim().is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let reply = state.gemini.generate(&build_prompt(&request.message)).await?;

    debug!(bot_output = %reply, model = %state.gemini.model(), "generated reply");

    Ok(Json(ChatResponse::reply(reply.trim())))
}
