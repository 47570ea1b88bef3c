//! In-memory chat message

use chatdesk_api::{HistoryMessage, Role};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Local identifier, never sent to the server
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Set only while an answer is outstanding
    pub streaming: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            streaming: false,
        }
    }

    /// Empty assistant turn awaiting the reply
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: String::new(),
            streaming: true,
        }
    }

    /// Fill in the answer and clear the streaming flag
    pub fn resolve(&mut self, answer: String) {
        self.content = answer;
        self.streaming = false;
    }
}

impl From<HistoryMessage> for Message {
    fn from(message: HistoryMessage) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: message.role,
            content: message.content,
            streaming: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_resolves_in_place() {
        let mut msg = Message::assistant_placeholder();
        let id = msg.id.clone();
        assert!(msg.streaming);
        assert!(msg.content.is_empty());

        msg.resolve("Done".to_string());
        assert_eq!(msg.id, id);
        assert_eq!(msg.content, "Done");
        assert!(!msg.streaming);
    }

    #[test]
    fn test_local_ids_are_unique() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
    }
}
