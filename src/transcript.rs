//! Message list backing the conversation view

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

/// Text shown in a placeholder bubble while a request is in flight.
pub const TYPING_INDICATOR: &str = "Typing...";

/// Token tying an in-flight request to the placeholder bubble it owns.
///
/// Each submission mints its own token, so interleaved submissions can
/// never resolve each other's placeholders, and a reply that outlives a
/// cleared conversation has nothing left to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(Uuid);

impl RequestToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// A single message in the conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pending: Option<RequestToken>,
}

impl Message {
    /// Whether this is a typing-indicator placeholder awaiting its reply.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Ordered message list. Rendering is a projection of this model; nothing
/// else holds conversation state.
pub struct Transcript {
    messages: VecDeque<Message>,
    max_messages: usize,
}

impl Transcript {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages,
        }
    }

    /// Append a user message.
    pub fn push_user(&mut self, text: String) {
        self.push(Message {
            role: Role::User,
            text,
            timestamp: Utc::now(),
            pending: None,
        });
    }

    /// Append a typing-indicator placeholder owned by `token`.
    pub fn push_placeholder(&mut self, token: RequestToken) {
        self.push(Message {
            role: Role::Bot,
            text: TYPING_INDICATOR.to_string(),
            timestamp: Utc::now(),
            pending: Some(token),
        });
    }

    /// Replace the placeholder owned by `token` with its final text,
    /// preserving its position. Returns false when no such placeholder
    /// remains (conversation cleared, or capped out) and the reply should
    /// be dropped.
    pub fn resolve(&mut self, token: RequestToken, text: String) -> bool {
        for message in self.messages.iter_mut() {
            if message.pending == Some(token) {
                message.text = text;
                message.pending = None;
                message.timestamp = Utc::now();
                return true;
            }
        }
        false
    }

    /// Drop all messages, including pending placeholders. Outstanding
    /// requests become unresolvable and their replies are discarded.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[allow(dead_code)]
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(Message::is_pending)
    }

    fn push(&mut self, message: Message) {
        self.messages.push_back(message);
        if self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(transcript: &Transcript) -> Vec<&str> {
        transcript.messages().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn messages_keep_append_order() {
        let mut transcript = Transcript::new(100);
        transcript.push_user("first".into());
        let token = RequestToken::new();
        transcript.push_placeholder(token);
        transcript.push_user("second".into());

        assert_eq!(texts(&transcript), vec!["first", TYPING_INDICATOR, "second"]);
        assert_eq!(
            transcript.messages().map(|m| m.role).collect::<Vec<_>>(),
            vec![Role::User, Role::Bot, Role::User]
        );
    }

    #[test]
    fn resolve_replaces_placeholder_in_place() {
        let mut transcript = Transcript::new(100);
        transcript.push_user("Hello".into());
        let token = RequestToken::new();
        transcript.push_placeholder(token);

        assert!(transcript.resolve(token, "Hi there".into()));
        assert_eq!(transcript.len(), 2);
        assert_eq!(texts(&transcript), vec!["Hello", "Hi there"]);
        assert!(!transcript.has_pending());
    }

    #[test]
    fn resolve_with_unknown_token_is_a_no_op() {
        let mut transcript = Transcript::new(100);
        transcript.push_placeholder(RequestToken::new());

        assert!(!transcript.resolve(RequestToken::new(), "late".into()));
        assert_eq!(texts(&transcript), vec![TYPING_INDICATOR]);
    }

    #[test]
    fn interleaved_placeholders_resolve_by_token() {
        let mut transcript = Transcript::new(100);
        transcript.push_user("one".into());
        let first = RequestToken::new();
        transcript.push_placeholder(first);
        transcript.push_user("two".into());
        let second = RequestToken::new();
        transcript.push_placeholder(second);

        // Replies arrive out of order; each still lands in its own bubble.
        assert!(transcript.resolve(second, "re: two".into()));
        assert!(transcript.resolve(first, "re: one".into()));
        assert_eq!(texts(&transcript), vec!["one", "re: one", "two", "re: two"]);
    }

    #[test]
    fn clear_invalidates_pending_placeholders() {
        let mut transcript = Transcript::new(100);
        let token = RequestToken::new();
        transcript.push_user("Hello".into());
        transcript.push_placeholder(token);
        transcript.clear();

        assert!(transcript.is_empty());
        assert!(!transcript.resolve(token, "stale".into()));
        assert!(transcript.is_empty());
    }

    #[test]
    fn cap_drops_oldest_messages() {
        let mut transcript = Transcript::new(3);
        for i in 0..5 {
            transcript.push_user(format!("m{i}"));
        }
        assert_eq!(texts(&transcript), vec!["m2", "m3", "m4"]);
    }
}
