//! HTTP profile source.
//!
//! Expects `GET {base}/profiles` to return a JSON array of profiles and
//! `PUT {base}/profiles/{id}` to accept one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::{ProfileSource, RemoteError};
use crate::core::Profile;

pub struct HttpProfileSource {
    client: Client,
    base_url: String,
}

impl HttpProfileSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn profiles_url(&self) -> String {
        format!("{}/profiles", self.base_url)
    }
}

fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RemoteError> {
        let response = self.client.get(self.profiles_url()).send().await?;
        let response = check_status(response)?;

        let body = response.text().await?;
        let profiles: Vec<Profile> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))?;

        tracing::debug!("Fetched {} profiles from {}", profiles.len(), self.base_url);
        Ok(profiles)
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.profiles_url(), profile.id);
        let response = self.client.put(&url).json(profile).send().await?;
        check_status(response)?;

        tracing::debug!("Saved profile {} to {}", profile.id, self.base_url);
        Ok(())
    }
}
