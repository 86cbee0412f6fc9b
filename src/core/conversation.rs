//! Conversation tracking for HackMatch.
//!
//! Handles:
//! - Find-or-create of the single conversation between two profiles
//! - Appending messages in call order
//! - Thread lookup by counterpart and the inbox summary view

use chrono::{DateTime, Utc};

use super::ids::IdGenerator;
use super::types::{now_millis, Conversation, Message};
use crate::error::{Error, Result};

/// One row of the inbox: a conversation seen from one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub counterpart_id: String,
    pub last_message: Message,
    pub last_message_time: DateTime<Utc>,
}

/// Conversation manager.
///
/// At most one conversation exists per unordered participant pair.
pub struct ConversationManager {
    conversations: Vec<Conversation>,
    ids: IdGenerator,
}

impl ConversationManager {
    /// Create an empty conversation manager.
    pub fn new() -> Self {
        Self::from_conversations(Vec::new())
    }

    /// Wrap an existing collection, dropping later duplicates of a pair.
    pub fn from_conversations(conversations: Vec<Conversation>) -> Self {
        let mut kept: Vec<Conversation> = Vec::with_capacity(conversations.len());
        for conv in conversations {
            let [a, b] = conv.participants();
            if kept.iter().any(|k| k.is_between(a, b)) {
                tracing::warn!("Dropping duplicate conversation {} between {} and {}", conv.id(), a, b);
                continue;
            }
            kept.push(conv);
        }
        Self {
            conversations: kept,
            ids: IdGenerator::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// The conversation between two profiles, in either order.
    pub fn find(&self, a: &str, b: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.is_between(a, b))
    }

    /// Messages exchanged between `self_id` and `other_id`; empty if none.
    pub fn get_conversation(&self, self_id: &str, other_id: &str) -> &[Message] {
        self.find(self_id, other_id)
            .map(Conversation::messages)
            .unwrap_or(&[])
    }

    /// Send `content` from `self_id` to `to_id`.
    ///
    /// Callers are expected to trim input and skip blank messages before
    /// calling; content is stored as given.
    pub fn send_message(&mut self, self_id: &str, to_id: &str, content: &str) -> Result<Message> {
        if self_id == to_id {
            return Err(Error::InvalidConversation(format!(
                "cannot message yourself ({})",
                self_id
            )));
        }

        let message = Message {
            id: self.ids.message_id()?,
            from: self_id.to_string(),
            content: content.to_string(),
            timestamp: now_millis(),
        };

        match self.conversations.iter().position(|c| c.is_between(self_id, to_id)) {
            Some(index) => {
                let conv = &mut self.conversations[index];
                conv.push(message.clone());
                tracing::debug!(
                    "Appended {} to {} ({} messages)",
                    message.id,
                    conv.id(),
                    conv.messages().len()
                );
            }
            None => {
                let conv = Conversation::new(
                    self.ids.conversation_id()?,
                    self_id,
                    to_id,
                    message.clone(),
                );
                tracing::debug!("Started conversation {} between {} and {}", conv.id(), self_id, to_id);
                self.conversations.push(conv);
            }
        }

        Ok(message)
    }

    /// Inbox for `self_id`, most recent conversation first.
    pub fn summaries_for(&self, self_id: &str) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .conversations
            .iter()
            .filter_map(|c| {
                let counterpart = c.counterpart(self_id)?;
                let last = c.last_message()?;
                Some(ConversationSummary {
                    conversation_id: c.id().to_string(),
                    counterpart_id: counterpart.to_string(),
                    last_message: last.clone(),
                    last_message_time: c.last_message_time(),
                })
            })
            .collect();

        // Ids are monotonic, so they break ties between same-millisecond sends.
        summaries.sort_by(|a, b| {
            b.last_message_time
                .cmp(&a.last_message_time)
                .then_with(|| b.last_message.id.cmp(&a.last_message.id))
        });
        summaries
    }
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_then_lookup_is_symmetric() {
        let mut mgr = ConversationManager::new();
        let sent = mgr.send_message("A", "B", "hi").unwrap();

        assert_eq!(mgr.get_conversation("A", "B"), &[sent.clone()]);
        assert_eq!(mgr.get_conversation("B", "A"), &[sent]);
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_reply_appends_to_same_conversation() {
        let mut mgr = ConversationManager::new();
        let first = mgr.send_message("A", "B", "hi").unwrap();
        let second = mgr.send_message("B", "A", "hey").unwrap();

        assert_eq!(mgr.len(), 1);
        let conv = mgr.find("A", "B").unwrap();
        assert_eq!(conv.messages(), &[first, second.clone()]);
        assert_eq!(conv.last_message_time(), second.timestamp);
        assert_eq!(conv.messages()[1].from, "B");
    }

    #[test]
    fn test_missing_conversation_is_empty() {
        let mgr = ConversationManager::new();
        assert!(mgr.get_conversation("A", "B").is_empty());
    }

    #[test]
    fn test_same_instant_sends_keep_call_order() {
        let mut mgr = ConversationManager::new();
        for i in 0..50 {
            mgr.send_message("A", "B", &format!("m{}", i)).unwrap();
        }
        let contents: Vec<String> = mgr
            .get_conversation("A", "B")
            .iter()
            .map(|m| m.content.clone())
            .collect();
        let expected: Vec<String> = (0..50).map(|i| format!("m{}", i)).collect();
        assert_eq!(contents, expected);

        let mut ids: Vec<&str> = mgr.get_conversation("A", "B").iter().map(|m| m.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_self_message_rejected() {
        let mut mgr = ConversationManager::new();
        assert!(mgr.send_message("A", "A", "hi").is_err());
        assert!(mgr.is_empty());
    }

    #[test]
    fn test_summaries_most_recent_first() {
        let mut mgr = ConversationManager::new();
        mgr.send_message("A", "B", "to b").unwrap();
        mgr.send_message("C", "A", "from c").unwrap();
        mgr.send_message("B", "C", "not mine").unwrap();

        let inbox = mgr.summaries_for("A");
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].counterpart_id, "C");
        assert_eq!(inbox[0].last_message.content, "from c");
        assert_eq!(inbox[1].counterpart_id, "B");
        assert!(inbox[0].last_message_time >= inbox[1].last_message_time);
    }

    #[test]
    fn test_duplicate_pairs_dropped_on_load() {
        let mut a = ConversationManager::new();
        a.send_message("A", "B", "one").unwrap();
        let mut b = ConversationManager::new();
        b.send_message("B", "A", "two").unwrap();

        let merged = ConversationManager::from_conversations(
            a.conversations().iter().chain(b.conversations()).cloned().collect(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get_conversation("A", "B")[0].content, "one");
    }
}
