//! Error types for HackMatch.

use thiserror::Error;

use crate::remote::RemoteError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote profile source error: {0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("Id generation error: {0}")]
    Id(String),

    #[error("{0}")]
    Other(String),
}
