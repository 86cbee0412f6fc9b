//! HackMatch library root.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod remote;
pub mod session;
pub mod storage;

pub use cli::Commands;
pub use config::{load_settings, load_settings_or_default, Settings};
pub use core::{
    apply_filter, Conversation, ConversationManager, FilterCriteria, Hackathon, Message, Profile,
    ProfileDirectory,
};
pub use error::{Error, Result};
pub use remote::{ProfileSource, RemoteError};
pub use session::Session;
pub use storage::{ConversationStore, KeyValueStore};
