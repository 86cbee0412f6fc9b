//! Application state for one signed-in user.
//!
//! The session owns the directory, the hackathon catalog, the conversation
//! collection and the current filter selection. It is constructed
//! explicitly and handed to whatever presents it.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::core::{
    all_locations, all_skills, apply_filter, ConversationManager, ConversationSummary,
    FilterCriteria, HackathonCatalog, Message, Profile, ProfileDirectory, ProfileDraft,
};
use crate::error::{Error, Result};
use crate::remote::{seed_hackathons, HttpProfileSource, LocalProfileSource, ProfileSource};
use crate::storage::{open_store, ConversationStore, KeyValueStore};

pub struct Session {
    current_user_id: String,
    directory: ProfileDirectory,
    hackathons: HackathonCatalog,
    conversations: ConversationManager,
    conversation_store: ConversationStore,
    profiles: Arc<dyn ProfileSource>,
    criteria: FilterCriteria,
}

impl Session {
    /// Build a session from settings: open the store, pick the profile
    /// source and load everything.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let data_dir = settings.data_dir()?;
        let store = open_store(settings.storage.backend, &data_dir)?;

        let profiles: Arc<dyn ProfileSource> = match settings.remote.base_url.as_deref() {
            Some(url) => Arc::new(HttpProfileSource::new(
                url,
                Duration::from_secs(settings.remote.timeout_secs),
            )?),
            None => Arc::new(LocalProfileSource::with_seed(store.clone())?),
        };

        let hackathons = seed_hackathons()?;
        Self::open(&settings.current_user_id, profiles, store, hackathons).await
    }

    /// Fetch the directory from `profiles` and restore saved conversations.
    pub async fn open(
        current_user_id: &str,
        profiles: Arc<dyn ProfileSource>,
        store: Arc<dyn KeyValueStore>,
        hackathons: Vec<crate::core::Hackathon>,
    ) -> Result<Self> {
        let listed = profiles.list_profiles().await?;
        tracing::info!("Loaded {} profiles from {} source", listed.len(), profiles.name());

        let conversation_store = ConversationStore::new(store);
        let conversations = ConversationManager::from_conversations(conversation_store.load());

        let session = Self {
            current_user_id: current_user_id.to_string(),
            directory: ProfileDirectory::new(listed),
            hackathons: HackathonCatalog::new(hackathons),
            conversations,
            conversation_store,
            profiles,
            criteria: FilterCriteria::default(),
        };

        if session.current_user().is_none() {
            tracing::warn!("Current user {} is not in the directory", session.current_user_id);
        }
        Ok(session)
    }

    pub fn current_user_id(&self) -> &str {
        &self.current_user_id
    }

    pub fn current_user(&self) -> Option<&Profile> {
        self.directory.get_by_id(&self.current_user_id)
    }

    pub fn directory(&self) -> &ProfileDirectory {
        &self.directory
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.directory.get_by_id(id)
    }

    pub fn hackathons(&self) -> &HackathonCatalog {
        &self.hackathons
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Restrict by hackathon id; `None` or an unknown id clears the criterion.
    pub fn select_hackathon_interest(&mut self, hackathon_id: Option<&str>) {
        self.criteria.hackathon_interests = hackathon_id
            .and_then(|id| self.hackathons.interest_title(id))
            .map(str::to_string)
            .unwrap_or_default();
    }

    /// The directory under the current criteria, recomputed on every call.
    pub fn filtered_profiles(&self) -> Vec<&Profile> {
        apply_filter(self.directory.profiles(), &self.criteria)
    }

    pub fn all_skills(&self) -> Vec<String> {
        all_skills(self.directory.profiles())
    }

    pub fn all_locations(&self) -> Vec<String> {
        all_locations(self.directory.profiles())
    }

    /// Messages between the current user and `other_id`.
    pub fn conversation_with(&self, other_id: &str) -> &[Message] {
        self.conversations.get_conversation(&self.current_user_id, other_id)
    }

    pub fn inbox(&self) -> Vec<ConversationSummary> {
        self.conversations.summaries_for(&self.current_user_id)
    }

    pub fn conversations(&self) -> &ConversationManager {
        &self.conversations
    }

    /// Send a message from the current user.
    ///
    /// Content is trimmed; blank content is a no-op returning `Ok(None)`.
    /// The snapshot is persisted after the send. A persistence failure is
    /// logged and the in-memory send stands.
    pub fn send_message(&mut self, to_id: &str, content: &str) -> Result<Option<Message>> {
        let content = content.trim();
        if content.is_empty() {
            tracing::debug!("Ignoring blank message to {}", to_id);
            return Ok(None);
        }
        if self.directory.get_by_id(to_id).is_none() {
            return Err(Error::NotFound(format!("profile {}", to_id)));
        }

        let message = self
            .conversations
            .send_message(&self.current_user_id, to_id, content)?;

        if let Err(e) = self.conversation_store.save(self.conversations.conversations()) {
            tracing::error!("Failed to persist conversations after {}: {}", message.id, e);
        }
        Ok(Some(message))
    }

    /// Upsert locally, then save through the profile source.
    ///
    /// If the source rejects the save the local change is rolled back and
    /// the error returned.
    pub async fn save_profile(&mut self, profile: Profile) -> Result<()> {
        let change = self.directory.upsert(profile.clone());

        match self.profiles.save_profile(&profile).await {
            Ok(()) => {
                tracing::info!("Saved profile {}", profile.id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Save of profile {} failed, rolling back: {}", profile.id, e);
                self.directory.restore(change);
                Err(e.into())
            }
        }
    }

    /// Validate a create-profile submission and save it.
    pub async fn create_profile(&mut self, draft: ProfileDraft) -> Result<Profile> {
        let profile = draft.into_profile()?;
        self.save_profile(profile.clone()).await?;
        Ok(profile)
    }
}
