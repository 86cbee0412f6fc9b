//! Core module - directory, filtering and conversation management.
//!
//! This module contains the in-memory heart of HackMatch:
//! - Profile directory and the pure filter engine over it
//! - Conversation threading between two profiles
//! - Hackathon catalog queries and profile creation

pub mod conversation;
pub mod directory;
pub mod filter;
pub mod hackathons;
pub mod ids;
pub mod types;
pub mod validation;

pub use conversation::{ConversationManager, ConversationSummary};
pub use directory::{ProfileDirectory, Upserted};
pub use filter::{all_locations, all_skills, apply_filter, SkillCategory};
pub use hackathons::{split_by_date, HackathonCatalog, LocationType};
pub use types::{Conversation, ConversationRecord, FilterCriteria, Hackathon, Message, Profile, ANY};
pub use validation::ProfileDraft;
