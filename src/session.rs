//! Explicit chat-session context.
//!
//! Everything a chat turn needs (the selected provider, key, model, and
//! conversation history) travels in a [`ChatSession`] value instead of
//! process-global state, so the patch engine and provider client stay
//! testable in isolation.

use crate::message::{Message, Role};
use crate::provider::ProviderDescriptor;

/// One interactive session against a selected provider and model.
pub struct ChatSession {
    pub descriptor: &'static ProviderDescriptor,
    pub key: String,
    pub model: String,
    pub history: Vec<Message>,
}

impl ChatSession {
    pub fn new(descriptor: &'static ProviderDescriptor, key: String, model: String) -> Self {
        Self {
            descriptor,
            key,
            model,
            history: Vec::new(),
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Message::user(text));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.history.push(Message::assistant(text));
    }

    /// Drop the most recent turn (used when a completion fails so the
    /// user can retry the same input).
    pub fn pop_last(&mut self) {
        self.history.pop();
    }

    /// Clear the conversation, keeping any system prompt.
    pub fn clear(&mut self) {
        self.history.retain(|m| m.role == Role::System);
    }
}
