//! Full-snapshot persistence of the conversation collection.

use std::sync::Arc;

use super::KeyValueStore;
use crate::core::{Conversation, ConversationRecord};
use crate::error::Result;

/// Slot holding the conversation snapshot.
pub const CONVERSATIONS_KEY: &str = "hackathon_conversations";

/// Loads and saves every conversation under one slot.
#[derive(Clone)]
pub struct ConversationStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the previous snapshot.
    ///
    /// Never fails: a missing, unreadable or malformed slot yields an empty
    /// collection. Individual records that break the conversation invariants
    /// are skipped.
    pub fn load(&self) -> Vec<Conversation> {
        let raw = match self.store.get(CONVERSATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(
                    "No saved conversations in {} slot {}",
                    self.store.name(),
                    CONVERSATIONS_KEY
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read saved conversations: {}", e);
                return Vec::new();
            }
        };

        let records: Vec<ConversationRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to parse saved conversations, starting empty: {}", e);
                return Vec::new();
            }
        };

        let conversations: Vec<Conversation> = records
            .into_iter()
            .filter_map(|record| match Conversation::try_from(record) {
                Ok(conv) => Some(conv),
                Err(e) => {
                    tracing::warn!("Skipping saved conversation: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Loaded {} conversations", conversations.len());
        conversations
    }

    /// Overwrite the slot with the whole collection.
    pub fn save(&self, conversations: &[Conversation]) -> Result<()> {
        let records: Vec<ConversationRecord> =
            conversations.iter().map(ConversationRecord::from).collect();
        let content = serde_json::to_string(&records)?;
        self.store.set(CONVERSATIONS_KEY, &content)?;
        tracing::debug!("Saved {} conversations", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversationManager;
    use crate::storage::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    fn sample() -> ConversationManager {
        let mut mgr = ConversationManager::new();
        mgr.send_message("1", "2", "hi").unwrap();
        mgr.send_message("2", "1", "hello back").unwrap();
        mgr.send_message("3", "1", "team up?").unwrap();
        mgr
    }

    #[test]
    fn test_round_trip_preserves_conversations() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConversationStore::new(Arc::new(JsonFileStore::new(temp_dir.path()).unwrap()));
        let mgr = sample();

        store.save(mgr.conversations()).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.len(), 2);
        for (before, after) in mgr.conversations().iter().zip(&loaded) {
            assert_eq!(before.participants(), after.participants());
            assert_eq!(before.messages(), after.messages());
            assert_eq!(
                before.last_message_time().timestamp_millis(),
                after.last_message_time().timestamp_millis()
            );
        }
    }

    #[test]
    fn test_snapshot_layout() {
        let kv = Arc::new(MemoryStore::new());
        let store = ConversationStore::new(kv.clone());
        store.save(sample().conversations()).unwrap();

        let raw = kv.get(CONVERSATIONS_KEY).unwrap().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &doc[0];
        assert_eq!(first["participants"], serde_json::json!(["1", "2"]));
        assert!(first["lastMessageTime"].as_str().unwrap().ends_with('Z'));
        assert_eq!(first["messages"][1]["from"], "2");
        assert!(first["messages"][0]["timestamp"].is_string());
    }

    #[test]
    fn test_missing_slot_is_empty() {
        let store = ConversationStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_slot_is_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(CONVERSATIONS_KEY, "{not json").unwrap();
        assert!(ConversationStore::new(kv.clone()).load().is_empty());

        kv.set(CONVERSATIONS_KEY, r#"[{"id":"c1","participants":["1","2"],"messages":[{"id":"m","from":"1","content":"x","timestamp":"yesterday"}],"lastMessageTime":"2025-01-01T00:00:00.000Z"}]"#)
            .unwrap();
        assert!(ConversationStore::new(kv).load().is_empty());
    }

    #[test]
    fn test_invalid_records_skipped() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            CONVERSATIONS_KEY,
            r#"[
                {"id":"bad","participants":["1"],"messages":[{"id":"m0","from":"1","content":"x","timestamp":"2025-01-01T00:00:00.000Z"}],"lastMessageTime":"2025-01-01T00:00:00.000Z"},
                {"id":"good","participants":["1","2"],"messages":[{"id":"m1","from":"2","content":"y","timestamp":"2025-01-02T10:00:00.250Z"}],"lastMessageTime":"2025-01-02T10:00:00.250Z"}
            ]"#,
        )
        .unwrap();

        let loaded = ConversationStore::new(kv).load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "good");
        assert_eq!(loaded[0].last_message_time().timestamp_subsec_millis(), 250);
    }
}
