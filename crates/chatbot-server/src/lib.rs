//! # chatbot_server
//!
//! HTTP chat service: accepts `POST /chat` with `{"message": ...}` and
//! answers `{"response": ...}` generated through the Gemini API.

pub mod error;
pub mod gemini;
pub mod handlers;

use axum::Router;
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};

use crate::gemini::GeminiClient;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Browser clients are served from other origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handlers::chat_handler))
        .layer(cors)
        .with_state(state)
}
