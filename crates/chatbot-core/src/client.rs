use reqwest::Client;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::protocol::{ChatRequest, ChatResponse};

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post one message and return the `response` field of the reply.
    ///
    /// The status code is not checked: the service reports its own failures
    /// as a `response` text and those are shown to the user as-is.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        debug!(endpoint = %self.endpoint, chars = message.chars().count(), "sending chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "chat service returned an error status");
        }

        let body = response.bytes().await?;
        let chat_response: ChatResponse = serde_json::from_slice(&body)?;
        chat_response.response.ok_or(ChatError::MissingReply)
    }
}
