use thiserror::Error;

/// Why a reply could not be obtained from the chat service.
///
/// Every variant is rendered to the user as the same fixed error text; the
/// distinction only shows up in the logs.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request to chat service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat service returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("chat service response has no `response` field")]
    MissingReply,
}
