//! Conversation history and the pending document slot.

use crate::types::Message;

/// Ordered chat history plus at most one document waiting to ride along with the next send.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationStore {
    messages: Vec<Message>,
    pending_attachment: Option<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// History in insertion order, which is also the order sent upstream.
    pub fn current_sequence(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replaces whatever was pending. Only one document travels per send.
    pub fn set_pending_attachment(&mut self, text: impl Into<String>) {
        self.pending_attachment = Some(text.into());
    }

    pub fn take_pending_attachment(&mut self) -> Option<String> {
        self.pending_attachment.take()
    }

    pub fn has_pending_attachment(&self) -> bool {
        self.pending_attachment.is_some()
    }

    /// Starts a new chat: drops history and any pending document.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending_attachment = None;
    }
}
