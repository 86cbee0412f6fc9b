//! Offline profile source: bundled seed directory plus locally saved profiles.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ProfileSource, RemoteError};
use crate::core::{Hackathon, Profile, ProfileDirectory};
use crate::storage::KeyValueStore;

/// Slot holding profiles created or edited locally.
pub const PROFILES_KEY: &str = "hackathon_profiles";

const SEED_PROFILES: &str = include_str!("../../data/profiles.json");
const SEED_HACKATHONS: &str = include_str!("../../data/hackathons.json");

/// The bundled directory.
pub fn seed_profiles() -> Result<Vec<Profile>, serde_json::Error> {
    serde_json::from_str(SEED_PROFILES)
}

/// The bundled hackathon catalog.
pub fn seed_hackathons() -> Result<Vec<Hackathon>, serde_json::Error> {
    serde_json::from_str(SEED_HACKATHONS)
}

pub struct LocalProfileSource {
    seed: Vec<Profile>,
    store: Arc<dyn KeyValueStore>,
}

impl LocalProfileSource {
    pub fn new(seed: Vec<Profile>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { seed, store }
    }

    /// Source over the bundled seed directory.
    pub fn with_seed(store: Arc<dyn KeyValueStore>) -> Result<Self, RemoteError> {
        let seed = seed_profiles().map_err(|e| RemoteError::Parse(format!("seed profiles: {}", e)))?;
        Ok(Self::new(seed, store))
    }

    /// Locally saved profiles. A malformed slot reads as empty so the seed
    /// directory still loads.
    fn saved(&self) -> Result<Vec<Profile>, RemoteError> {
        let raw = self
            .store
            .get(PROFILES_KEY)
            .map_err(|e| RemoteError::NotAvailable(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(profiles) => Ok(profiles),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed saved profiles in {} slot {}: {}",
                    self.store.name(),
                    PROFILES_KEY,
                    e
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl ProfileSource for LocalProfileSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RemoteError> {
        let mut directory = ProfileDirectory::new(self.seed.clone());
        for profile in self.saved()? {
            directory.upsert(profile);
        }
        Ok(directory.profiles().to_vec())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), RemoteError> {
        let mut saved = ProfileDirectory::new(self.saved()?);
        saved.upsert(profile.clone());

        let content =
            serde_json::to_string(saved.profiles()).map_err(|e| RemoteError::Parse(e.to_string()))?;
        self.store
            .set(PROFILES_KEY, &content)
            .map_err(|e| RemoteError::NotAvailable(e.to_string()))?;

        tracing::debug!("Saved profile {} locally", profile.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_seed_data_parses() {
        let profiles = seed_profiles().unwrap();
        assert_eq!(profiles.len(), 10);
        assert_eq!(profiles[0].id, "1");
        assert_eq!(profiles[0].name, "Alex Johnson");

        let hackathons = seed_hackathons().unwrap();
        assert_eq!(hackathons.len(), 6);
        assert!(hackathons.iter().any(|h| h.title == "ETHGlobal" && h.is_online));
    }

    #[tokio::test]
    async fn test_saved_profiles_overlay_seed() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let source = LocalProfileSource::with_seed(store.clone()).unwrap();

        let mut alex = source.list_profiles().await.unwrap()[0].clone();
        alex.bio = "Now writing Rust".to_string();
        source.save_profile(&alex).await.unwrap();

        let mut newcomer = alex.clone();
        newcomer.id = "user-new".to_string();
        source.save_profile(&newcomer).await.unwrap();

        // A fresh source over the same store sees both changes.
        let reopened = LocalProfileSource::with_seed(store).unwrap();
        let profiles = reopened.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 11);
        assert_eq!(profiles[0].bio, "Now writing Rust");
        assert_eq!(profiles[10].id, "user-new");
    }

    #[tokio::test]
    async fn test_malformed_saved_slot_falls_back_to_seed() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(PROFILES_KEY, "{not json").unwrap();
        let source = LocalProfileSource::with_seed(store.clone()).unwrap();

        assert_eq!(source.list_profiles().await.unwrap().len(), 10);

        // The next save replaces the unreadable slot.
        let mut newcomer = seed_profiles().unwrap()[0].clone();
        newcomer.id = "user-new".to_string();
        source.save_profile(&newcomer).await.unwrap();
        assert_eq!(source.list_profiles().await.unwrap().len(), 11);
    }
}
