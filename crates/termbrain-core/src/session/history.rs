use crate::llm::Message;
use std::collections::VecDeque;

/// The literal transcript sent to the provider. Unbounded in memory for
/// the current run; the persisted copy is windowed at save time.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: messages.into(),
        }
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push_back(Message::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push_back(Message::assistant(content));
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// The most recent `window` messages, for persistence.
    pub fn windowed(&self, window: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(window);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
