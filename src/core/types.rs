//! Data model shared by the directory, filter engine and messaging.
//!
//! Field names serialize in camelCase so records line up with the profile
//! collaborator and with the persisted conversation snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel meaning "no restriction" for location and hackathon interest.
pub const ANY: &str = "_any";

/// A directory entry representing one prospective teammate.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
    /// Hackathon titles, not ids.
    #[serde(default)]
    pub hackathon_interests: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Read-only hackathon listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hackathon {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "iso8601")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub is_online: bool,
    pub url: String,
    pub organizer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A single direct message. Immutable once created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    /// Sender profile id.
    pub from: String,
    pub content: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// Ordered message history between exactly two profiles.
///
/// Fields are private so that `last_message_time` can only move together
/// with the message list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    id: String,
    participants: [String; 2],
    messages: Vec<Message>,
    last_message_time: DateTime<Utc>,
}

impl Conversation {
    /// Start a conversation with its first message.
    pub fn new(id: impl Into<String>, a: &str, b: &str, first: Message) -> Self {
        let last_message_time = first.timestamp;
        Self {
            id: id.into(),
            participants: [a.to_string(), b.to_string()],
            messages: vec![first],
            last_message_time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn participants(&self) -> &[String; 2] {
        &self.participants
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_message_time(&self) -> DateTime<Utc> {
        self.last_message_time
    }

    /// Whether this conversation is between `a` and `b`, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        let [x, y] = &self.participants;
        (x == a && y == b) || (x == b && y == a)
    }

    pub fn involves(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p == id)
    }

    /// The participant that is not `id`.
    pub fn counterpart(&self, id: &str) -> Option<&str> {
        let [x, y] = &self.participants;
        if x == id {
            Some(y)
        } else if y == id {
            Some(x)
        } else {
            None
        }
    }

    /// Append a message and move `last_message_time` to its timestamp.
    pub fn push(&mut self, message: Message) {
        self.last_message_time = message.timestamp;
        self.messages.push(message);
    }
}

/// Persisted shape of a conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub participants: Vec<String>,
    pub messages: Vec<Message>,
    #[serde(with = "iso8601")]
    pub last_message_time: DateTime<Utc>,
}

impl From<&Conversation> for ConversationRecord {
    fn from(conv: &Conversation) -> Self {
        Self {
            id: conv.id.clone(),
            participants: conv.participants.to_vec(),
            messages: conv.messages.clone(),
            last_message_time: conv.last_message_time,
        }
    }
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = crate::error::Error;

    /// Rebuild a conversation, re-deriving `last_message_time` from the
    /// messages rather than trusting the stored copy.
    fn try_from(record: ConversationRecord) -> Result<Self, Self::Error> {
        use crate::error::Error;

        let [a, b]: [String; 2] = record.participants.try_into().map_err(|p: Vec<String>| {
            Error::InvalidConversation(format!(
                "{}: expected 2 participants, found {}",
                record.id,
                p.len()
            ))
        })?;
        if a == b {
            return Err(Error::InvalidConversation(format!(
                "{}: participants must be distinct",
                record.id
            )));
        }
        let last = record.messages.last().ok_or_else(|| {
            Error::InvalidConversation(format!("{}: no messages", record.id))
        })?;

        Ok(Self {
            last_message_time: last.timestamp,
            id: record.id,
            participants: [a, b],
            messages: record.messages,
        })
    }
}

/// The user's current search/filter selection.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Any-of match, exact and case-sensitive.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
    /// Single hackathon title, substring matched.
    #[serde(default)]
    pub hackathon_interests: String,
    #[serde(default)]
    pub search_term: String,
}

impl FilterCriteria {
    /// Add the skill if absent, remove it if present.
    pub fn toggle_skill(&mut self, skill: &str) {
        if let Some(pos) = self.skills.iter().position(|s| s == skill) {
            self.skills.remove(pos);
        } else {
            self.skills.push(skill.to_string());
        }
    }

    /// Reset every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any criterion restricts the result.
    pub fn is_active(&self) -> bool {
        !self.skills.is_empty()
            || is_set(&self.location)
            || is_set(&self.hackathon_interests)
            || !self.search_term.is_empty()
    }
}

/// A free-text criterion that is neither empty nor the [`ANY`] sentinel.
pub(crate) fn is_set(value: &str) -> bool {
    !value.is_empty() && value != ANY
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Current time truncated to whole milliseconds, the precision timestamps
/// survive persistence with.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, from: &str, ms: i64) -> Message {
        Message {
            id: id.to_string(),
            from: from.to_string(),
            content: format!("message {}", id),
            timestamp: DateTime::from_timestamp_millis(ms).unwrap(),
        }
    }

    #[test]
    fn test_conversation_push_tracks_last_time() {
        let mut conv = Conversation::new("c1", "1", "2", msg("m1", "1", 1_000));
        assert_eq!(conv.last_message_time().timestamp_millis(), 1_000);

        conv.push(msg("m2", "2", 2_500));
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.last_message_time().timestamp_millis(), 2_500);
        assert_eq!(conv.last_message().unwrap().id, "m2");
    }

    #[test]
    fn test_conversation_is_between_either_order() {
        let conv = Conversation::new("c1", "1", "2", msg("m1", "1", 0));
        assert!(conv.is_between("1", "2"));
        assert!(conv.is_between("2", "1"));
        assert!(!conv.is_between("1", "3"));
        assert_eq!(conv.counterpart("1"), Some("2"));
        assert_eq!(conv.counterpart("3"), None);
    }

    #[test]
    fn test_record_rejects_bad_participants() {
        let record = ConversationRecord {
            id: "c1".to_string(),
            participants: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            messages: vec![msg("m1", "1", 0)],
            last_message_time: DateTime::from_timestamp_millis(0).unwrap(),
        };
        assert!(Conversation::try_from(record).is_err());

        let record = ConversationRecord {
            id: "c2".to_string(),
            participants: vec!["1".to_string(), "1".to_string()],
            messages: vec![msg("m1", "1", 0)],
            last_message_time: DateTime::from_timestamp_millis(0).unwrap(),
        };
        assert!(Conversation::try_from(record).is_err());
    }

    #[test]
    fn test_record_rederives_last_message_time() {
        let record = ConversationRecord {
            id: "c1".to_string(),
            participants: vec!["1".to_string(), "2".to_string()],
            messages: vec![msg("m1", "1", 10), msg("m2", "2", 20)],
            last_message_time: DateTime::from_timestamp_millis(5).unwrap(),
        };
        let conv = Conversation::try_from(record).unwrap();
        assert_eq!(conv.last_message_time().timestamp_millis(), 20);
    }

    #[test]
    fn test_message_timestamp_is_iso_text() {
        let json = serde_json::to_value(msg("m1", "1", 1_700_000_000_123)).unwrap();
        assert_eq!(json["timestamp"], "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_criteria_toggle_and_clear() {
        let mut criteria = FilterCriteria::default();
        assert!(!criteria.is_active());

        criteria.toggle_skill("Rust");
        assert_eq!(criteria.skills, vec!["Rust"]);
        assert!(criteria.is_active());

        criteria.toggle_skill("Rust");
        assert!(criteria.skills.is_empty());

        criteria.location = ANY.to_string();
        assert!(!criteria.is_active());

        criteria.search_term = "go".to_string();
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
