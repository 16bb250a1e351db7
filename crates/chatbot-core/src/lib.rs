pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use client::ChatClient;
pub use config::Config;
pub use error::ChatError;
pub use protocol::{ChatRequest, ChatResponse};
pub use session::{ChatSession, PendingReply, CONNECT_ERROR_TEXT, PLACEHOLDER_TEXT};
pub use state::{ChatMessage, ChatRole, EntryId, Transcript};
