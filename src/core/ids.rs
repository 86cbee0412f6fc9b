//! Process-unique id generation.
//!
//! ULIDs from a monotonic generator: ids minted within the same millisecond
//! still sort in creation order and never collide.

use ulid::Generator;

use crate::error::{Error, Result};

/// Prefixed id generator, owned by one `ConversationManager`.
pub struct IdGenerator {
    inner: Generator,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    /// Next id in the form `<prefix>-<ulid>`.
    pub fn next(&mut self, prefix: &str) -> Result<String> {
        let ulid = self
            .inner
            .generate()
            .map_err(|e| Error::Id(format!("monotonic overflow: {}", e)))?;
        Ok(format!("{}-{}", prefix, ulid))
    }

    pub fn message_id(&mut self) -> Result<String> {
        self.next("msg")
    }

    pub fn conversation_id(&mut self) -> Result<String> {
        self.next("convo")
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh profile id for a newly created profile.
pub fn profile_id() -> String {
    format!("user-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut ids = IdGenerator::new();
        let minted: Vec<String> = (0..1000).map(|_| ids.message_id().unwrap()).collect();

        let unique: HashSet<&String> = minted.iter().collect();
        assert_eq!(unique.len(), minted.len());

        let mut sorted = minted.clone();
        sorted.sort();
        assert_eq!(sorted, minted);
    }

    #[test]
    fn test_prefixes() {
        let mut ids = IdGenerator::new();
        assert!(ids.message_id().unwrap().starts_with("msg-"));
        assert!(ids.conversation_id().unwrap().starts_with("convo-"));
        assert!(profile_id().starts_with("user-"));
    }
}
