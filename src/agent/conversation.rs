//! Conversation log
//!
//! Append-only message history owned by a single agent. Read for prompt
//! construction and for stall detection.

use crate::core::Message;

/// Ordered, append-only conversation history
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Append an assistant message
    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    /// Append a system message
    pub fn add_system(&mut self, content: impl Into<String>) {
        self.push(Message::system(content));
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Detect repetition-based stalling.
    ///
    /// True when the most recent message's content appears at least
    /// `duplicate_threshold` more times among the preceding messages,
    /// scanned backward from the end.
    pub fn is_stalled(&self, duplicate_threshold: usize) -> bool {
        if self.messages.len() < 2 {
            return false;
        }

        let last = &self.messages[self.messages.len() - 1].content;
        let mut count = 0;

        for message in self.messages[..self.messages.len() - 1].iter().rev() {
            if &message.content == last {
                count += 1;
                if count >= duplicate_threshold {
                    return true;
                }
            }
        }

        false
    }
}
