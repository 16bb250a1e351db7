//! UI-agnostic transcript types
//!
//! The transcript is append-only. The only mutation after an entry is pushed
//! is the one-time replacement of an assistant placeholder's text once its
//! reply (or failure) arrives.

use serde::{Deserialize, Serialize};

/// A chat message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Set while an assistant entry still shows its loading text.
    #[serde(default)]
    pub pending: bool,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_string(),
            pending: false,
        }
    }

    pub fn placeholder(content: &str) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.to_string(),
            pending: true,
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "You:",
            ChatRole::Assistant => "AI:",
        }
    }
}

/// Position of an entry in its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> EntryId {
        self.messages.push(message);
        EntryId(self.messages.len() - 1)
    }

    /// Replace the text of a pending placeholder.
    ///
    /// Returns false when `id` does not name a pending assistant entry, which
    /// includes a placeholder that was already resolved.
    pub fn resolve(&mut self, id: EntryId, content: String) -> bool {
        match self.messages.get_mut(id.0) {
            Some(message) if message.role == ChatRole::Assistant && message.pending => {
                message.content = content;
                message.pending = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&ChatMessage> {
        self.messages.get(id.0)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }
}
