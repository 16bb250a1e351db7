//! The submit/receive cycle of the chat client.
//!
//! `submit` does everything that happens before the network call and hands
//! back a [`PendingReply`]; whoever performs the call feeds the outcome to
//! `resolve`. The TUI does this across a spawned task, `submit_and_wait`
//! does it inline.

use tracing::{debug, warn};

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::state::{ChatMessage, EntryId, Transcript};

/// Text of the assistant entry while its reply is outstanding.
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Text shown in place of a reply when the service could not be reached or
/// answered with something unreadable.
pub const CONNECT_ERROR_TEXT: &str = "Error connecting to AI 😢";

/// A submitted message whose reply has not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// The placeholder entry the reply belongs in.
    pub entry: EntryId,
    /// Trimmed text to send.
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    pub input: String,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Move the input buffer into the transcript.
    ///
    /// Appends the user entry and its placeholder and clears the buffer.
    /// Whitespace-only input leaves everything untouched and returns `None`.
    pub fn submit(&mut self) -> Option<PendingReply> {
        let message = self.input.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();

        self.transcript.push(ChatMessage::user(&message));
        let entry = self.transcript.push(ChatMessage::placeholder(PLACEHOLDER_TEXT));
        self.input.clear();

        debug!(entry = entry.index(), "message submitted");
        Some(PendingReply { entry, message })
    }

    /// Fill in the placeholder with the reply, or with the error text.
    pub fn resolve(&mut self, entry: EntryId, outcome: Result<String, ChatError>) -> bool {
        let content = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                warn!(entry = entry.index(), error = %err, "chat request failed");
                CONNECT_ERROR_TEXT.to_string()
            }
        };

        let resolved = self.transcript.resolve(entry, content);
        if !resolved {
            warn!(entry = entry.index(), "reply for an entry that is not awaiting one");
        }
        resolved
    }

    /// Submit and block on the reply. Returns the assistant entry, if any.
    pub async fn submit_and_wait(&mut self, client: &ChatClient) -> Option<EntryId> {
        let pending = self.submit()?;
        let outcome = client.send(&pending.message).await;
        self.resolve(pending.entry, outcome);
        Some(pending.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;

    fn session_with(input: &str) -> ChatSession {
        let mut session = ChatSession::new();
        session.input = input.to_string();
        session
    }

    #[test]
    fn test_whitespace_submit_is_noop() {
        let mut session = session_with("   \t ");
        assert_eq!(session.submit(), None);
        assert!(session.transcript().is_empty());
        assert_eq!(session.input, "   \t ");
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut session = ChatSession::new();
        assert_eq!(session.submit(), None);
        assert!(session.transcript().is_empty());
        assert_eq!(session.input, "");
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let mut session = session_with("  Hello ");
        let pending = session.submit().unwrap();

        assert_eq!(pending.message, "Hello");
        assert_eq!(session.input, "");

        let messages = session.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::user("Hello"));
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, PLACEHOLDER_TEXT);
        assert!(messages[1].pending);
        assert_eq!(pending.entry.index(), 1);
    }

    #[test]
    fn test_resolve_success() {
        let mut session = session_with("Hello");
        let pending = session.submit().unwrap();

        assert!(session.resolve(pending.entry, Ok("Hi there".to_string())));

        let reply = session.transcript().get(pending.entry).unwrap();
        assert_eq!(reply.content, "Hi there");
        assert!(!reply.pending);
    }

    #[test]
    fn test_resolve_failure_shows_error_text() {
        let mut session = session_with("Hello");
        let pending = session.submit().unwrap();

        session.resolve(pending.entry, Err(ChatError::MissingReply));

        let reply = session.transcript().get(pending.entry).unwrap();
        assert_eq!(reply.content, CONNECT_ERROR_TEXT);
        assert_eq!(session.input, "");
    }

    #[test]
    fn test_overlapping_replies_land_in_their_own_entries() {
        let mut session = session_with("first");
        let first = session.submit().unwrap();
        session.input = "second".to_string();
        let second = session.submit().unwrap();

        // Second reply arrives before the first.
        session.resolve(second.entry, Ok("reply two".to_string()));
        session.resolve(first.entry, Ok("reply one".to_string()));

        let contents: Vec<&str> = session
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "reply one", "second", "reply two"]);
    }

    #[test]
    fn test_pairs_alternate_roles() {
        let mut session = ChatSession::new();
        for i in 0..3 {
            session.input = format!("message {}", i);
            let pending = session.submit().unwrap();
            session.resolve(pending.entry, Ok(format!("reply {}", i)));
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 6);
        for (i, message) in transcript.iter().enumerate() {
            let expected = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
            assert_eq!(message.role, expected);
        }
    }
}
