//! Profile collaborator: where the directory is read from and saved to.

pub mod http;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Profile;

pub use http::HttpProfileSource;
pub use local::{seed_hackathons, seed_profiles, LocalProfileSource, PROFILES_KEY};

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Profile source not available: {0}")]
    NotAvailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

/// Read/write access to the profile catalog.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// List all profiles.
    async fn list_profiles(&self) -> Result<Vec<Profile>, RemoteError>;

    /// Insert or replace a profile by id.
    async fn save_profile(&self, profile: &Profile) -> Result<(), RemoteError>;
}
