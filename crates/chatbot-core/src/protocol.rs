//! JSON bodies exchanged with the chat service.
//!
//! Shared by the client and the service so both sides agree on field names.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// A request without `message` is treated as an empty message.
    #[serde(default)]
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Body returned by `POST /chat`, for successful and failed requests alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ChatResponse {
    pub fn reply(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
        }
    }
}
